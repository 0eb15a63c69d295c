use anyhow::Result;
use num_bigint::BigInt;
use tracing::debug;

use crate::config::NetworkConfig;
use crate::processors::events::normalized::PairSwapEvent;
use crate::store::models::{Fill, Source};
use crate::store::SwapStore;

/// Records Uniswap V2 family pair swaps as fills.
///
/// Only swaps sent by the exchange proxy are of interest (those come from
/// the `sellToUniswap` / `sellToPancakeSwap` VIP paths); direct user trades
/// against the same pairs are someone else's business.
pub struct UniswapV2Processor {
    network: NetworkConfig,
}

impl UniswapV2Processor {
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    pub fn handle_pair_swap<S: SwapStore>(&self, store: &mut S, event: &PairSwapEvent) -> Result<()> {
        if event.sender != self.network.exchange_proxy {
            return Ok(());
        }

        let ctx = &event.context;
        let source = self.network.classify_pool(&ctx.address);
        if source == Source::Unknown {
            debug!("ignoring pair swap from unclassified pool {}", ctx.address);
            return Ok(());
        }

        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = format!("{}-{}-{}", tx.id, source, ctx.log_index);
        if store.load_fill(&fill_id).is_some() {
            debug!("fill {} already recorded, skipping replay", fill_id);
            return Ok(());
        }

        // Exactly one side has a non-zero input amount; that side entered
        // the pair and fixes the direction.
        let (input_token, output_token, input_amount, output_amount) = if event.amount1_in
            == BigInt::from(0)
        {
            (event.token0, event.token1, &event.amount0_in, &event.amount1_out)
        } else {
            (event.token1, event.token0, &event.amount1_in, &event.amount0_out)
        };

        store.taker_find_or_create(event.to);

        let fill = Fill {
            id: fill_id.clone(),
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            log_index: Some(ctx.log_index),
            source,
            sender: Some(event.sender),
            recipient: Some(event.to),
            provider: Some(ctx.address),
            input_token,
            output_token,
            input_token_amount: input_amount.clone(),
            output_token_amount: output_amount.clone(),
        };
        store.save_fill(fill);
        tx.fills.push(fill_id);
        store.save_transaction(tx);
        Ok(())
    }
}

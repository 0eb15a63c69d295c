use anyhow::Result;
use num_bigint::BigInt;
use tracing::debug;

use crate::config::NetworkConfig;
use crate::processors::events::normalized::PoolSwapEvent;
use crate::store::models::{Fill, Source};
use crate::store::SwapStore;

/// Records Uniswap V3 pool swaps as fills.
///
/// V3 reports signed pool deltas: the positive amount entered the pool and
/// is the fill's input, the negative amount left it and is negated into the
/// output magnitude. Sign normalization happens here, at the boundary where
/// the fill is constructed, so the matching engine only ever sees
/// magnitudes.
pub struct UniswapV3Processor {
    network: NetworkConfig,
}

impl UniswapV3Processor {
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    pub fn handle_pool_swap<S: SwapStore>(&self, store: &mut S, event: &PoolSwapEvent) -> Result<()> {
        // Only swaps routed through the exchange proxy are attributable.
        if event.sender != self.network.exchange_proxy {
            return Ok(());
        }

        let ctx = &event.context;
        let source = self.network.classify_pool(&ctx.address);
        if source == Source::Unknown {
            debug!("ignoring pool swap from unclassified pool {}", ctx.address);
            return Ok(());
        }

        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = format!("{}-{}-{}", tx.id, source, ctx.log_index);
        if store.load_fill(&fill_id).is_some() {
            debug!("fill {} already recorded, skipping replay", fill_id);
            return Ok(());
        }

        let zero = BigInt::from(0);
        let (input_token, output_token, input_amount, output_amount) = if event.amount0 > zero {
            (event.token0, event.token1, event.amount0.clone(), -event.amount1.clone())
        } else {
            (event.token1, event.token0, event.amount1.clone(), -event.amount0.clone())
        };

        store.taker_find_or_create(event.recipient);

        let fill = Fill {
            id: fill_id.clone(),
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            log_index: Some(ctx.log_index),
            source,
            sender: Some(event.sender),
            recipient: Some(event.recipient),
            provider: Some(ctx.address),
            input_token,
            output_token,
            input_token_amount: input_amount,
            output_token_amount: output_amount,
        };
        store.save_fill(fill);
        tx.fills.push(fill_id);
        store.save_transaction(tx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkId;
    use crate::processors::events::normalized::EventContext;
    use crate::store::InMemoryStore;
    use crate::utils::Address;

    const USDC_WETH_POOL: &str = "0x88e6a0c2ddd26feeb64f039a2c41296fced0f900";

    fn addr(tail: u8) -> Address {
        let mut raw = [0u8; 20];
        raw[19] = tail;
        Address(raw)
    }

    fn pool_event(sender: Address, amount0: i64, amount1: i64) -> PoolSwapEvent {
        PoolSwapEvent {
            context: EventContext {
                transaction_hash: "0xbbb".to_string(),
                block_number: 18_000_000,
                block_timestamp: 1_700_000_000,
                log_index: 8,
                address: USDC_WETH_POOL.parse().unwrap(),
            },
            sender,
            recipient: addr(0x42),
            token0: addr(1),
            token1: addr(2),
            amount0: BigInt::from(amount0),
            amount1: BigInt::from(amount1),
        }
    }

    #[test]
    fn test_pool_swap_token0_in() {
        let network = NetworkConfig::for_network(NetworkId::Mainnet).unwrap();
        let processor = UniswapV3Processor::new(network.clone());
        let mut store = InMemoryStore::new();

        // token0 entered the pool (+2500), token1 left it (-1000)
        let event = pool_event(network.exchange_proxy, 2_500, -1_000);
        processor.handle_pool_swap(&mut store, &event).unwrap();

        let fill = store.load_fill("0xbbb-UniswapV3-8").expect("fill recorded");
        assert_eq!(fill.input_token, addr(1));
        assert_eq!(fill.output_token, addr(2));
        assert_eq!(fill.input_token_amount, BigInt::from(2_500));
        assert_eq!(fill.output_token_amount, BigInt::from(1_000), "output sign normalized");
    }

    #[test]
    fn test_pool_swap_token1_in() {
        let network = NetworkConfig::for_network(NetworkId::Mainnet).unwrap();
        let processor = UniswapV3Processor::new(network.clone());
        let mut store = InMemoryStore::new();

        let event = pool_event(network.exchange_proxy, -900, 4_000);
        processor.handle_pool_swap(&mut store, &event).unwrap();

        let fill = store.load_fill("0xbbb-UniswapV3-8").unwrap();
        assert_eq!(fill.input_token, addr(2));
        assert_eq!(fill.output_token, addr(1));
        assert_eq!(fill.input_token_amount, BigInt::from(4_000));
        assert_eq!(fill.output_token_amount, BigInt::from(900));
    }

    #[test]
    fn test_pool_swap_ignores_third_party_sender() {
        let network = NetworkConfig::for_network(NetworkId::Mainnet).unwrap();
        let processor = UniswapV3Processor::new(network.clone());
        let mut store = InMemoryStore::new();

        let event = pool_event(addr(0x99), 2_500, -1_000);
        processor.handle_pool_swap(&mut store, &event).unwrap();

        assert!(store.load_transaction("0xbbb").is_none());
    }

    #[test]
    fn test_pool_swap_ignores_unclassified_pool() {
        let network = NetworkConfig::for_network(NetworkId::Mainnet).unwrap();
        let processor = UniswapV3Processor::new(network.clone());
        let mut store = InMemoryStore::new();

        let mut event = pool_event(network.exchange_proxy, 2_500, -1_000);
        event.context.address = addr(0x99);
        processor.handle_pool_swap(&mut store, &event).unwrap();

        assert!(store.load_transaction("0xbbb").is_none());
    }
}

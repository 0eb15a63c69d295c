use anyhow::Result;
use num_bigint::BigInt;
use tracing::debug;

use super::matching::{self, SwapPosition};
use crate::config::NetworkConfig;
use crate::processors::events::normalized::{
    Erc1155OrderFilledEvent, Erc721OrderFilledEvent, LiquidityProviderSwapEvent,
    NativeOrderFilledEvent, SellToUniswapCall, SellToUniswapV3Call, TransformedErc20Event,
    UniswapV3CallKind,
};
use crate::processors::events::VolumeCalculator;
use crate::store::models::{
    Erc1155OrderFill, Erc721OrderFill, Fill, NativeOrderFill, NativeOrderType, Source, Swap,
    SwapMethod, TradeDirection,
};
use crate::store::SwapStore;
use crate::utils::address::normalize_token_address;

/// Handlers for everything emitted by or called on the exchange proxy:
/// aggregator swap events, VIP sell calls, and native/NFT order fills.
pub struct ExchangeProxyProcessor {
    network: NetworkConfig,
    volumes: VolumeCalculator,
}

impl ExchangeProxyProcessor {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            volumes: VolumeCalculator::new(),
        }
    }

    pub fn handle_transformed_erc20<S: SwapStore>(
        &self,
        store: &mut S,
        event: &TransformedErc20Event,
    ) -> Result<()> {
        let ctx = &event.context;
        debug!("found transformERC20 swap in tx {}", ctx.transaction_hash);

        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let swap_id = Swap::event_id(&tx.id, ctx.log_index);
        if store.load_swap(&swap_id).is_some() {
            debug!("swap {} already recorded, skipping replay", swap_id);
            return Ok(());
        }

        let fills = matching::find_transform_erc20_fills(store, &tx, ctx.log_index, &self.network);
        let (_, volumes) = matching::assemble_swap(
            store,
            &mut tx,
            SwapMethod::TransformErc20,
            SwapPosition::Event {
                log_index: ctx.log_index,
            },
            &fills,
            event.input_token,
            event.output_token,
            event.input_token_amount.clone(),
            event.output_token_amount.clone(),
            event.taker,
            None,
        );
        self.volumes.apply_swap_volumes(store, &volumes);
        self.volumes.record_swap(store, event.taker);
        Ok(())
    }

    pub fn handle_liquidity_provider_swap<S: SwapStore>(
        &self,
        store: &mut S,
        event: &LiquidityProviderSwapEvent,
    ) -> Result<()> {
        let ctx = &event.context;
        debug!("found sellToLiquidityProvider swap in tx {}", ctx.transaction_hash);

        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let swap_id = Swap::event_id(&tx.id, ctx.log_index);
        if store.load_swap(&swap_id).is_some() {
            debug!("swap {} already recorded, skipping replay", swap_id);
            return Ok(());
        }

        // TODO: decode the LP sandbox's own events as fills so the synthetic
        // record below can go away.
        let mut fills =
            matching::find_liquidity_provider_fills(store, &tx, ctx.log_index, &self.network);
        if fills.is_empty() {
            let fill = Fill {
                id: format!("{}-{}-{}", tx.id, event.provider, ctx.log_index),
                transaction: tx.id.clone(),
                block_number: tx.block_number,
                timestamp: tx.timestamp,
                log_index: Some(ctx.log_index),
                source: Source::LiquidityProvider,
                sender: Some(self.network.exchange_proxy),
                recipient: Some(event.recipient),
                provider: Some(event.provider),
                input_token: event.input_token,
                output_token: event.output_token,
                input_token_amount: event.input_token_amount.clone(),
                output_token_amount: event.output_token_amount.clone(),
            };
            store.save_fill(fill.clone());
            tx.fills.push(fill.id.clone());
            store.save_transaction(tx.clone());
            fills = vec![fill];
        }

        let (_, volumes) = matching::assemble_swap(
            store,
            &mut tx,
            SwapMethod::LiquidityProvider,
            SwapPosition::Event {
                log_index: ctx.log_index,
            },
            &fills,
            event.input_token,
            event.output_token,
            event.input_token_amount.clone(),
            event.output_token_amount.clone(),
            event.recipient,
            Some(event.provider.to_hex()),
        );
        self.volumes.apply_swap_volumes(store, &volumes);
        self.volumes.record_swap(store, event.recipient);
        Ok(())
    }

    /// RFQ, OTC and limit order fills: one Fill plus one NativeOrderFill,
    /// never a Swap. These records sit outside the matching window.
    pub fn handle_native_order_filled<S: SwapStore>(
        &self,
        store: &mut S,
        event: &NativeOrderFilledEvent,
        order_type: NativeOrderType,
    ) -> Result<()> {
        let ctx = &event.context;
        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);

        let fill_id = format!("{}-{}-{}", tx.id, event.order_hash, ctx.log_index);
        if store.load_fill(&fill_id).is_some() {
            debug!("native order fill {} already recorded, skipping replay", fill_id);
            return Ok(());
        }

        let source = match order_type {
            NativeOrderType::RfqOrder => Source::RfqOrder,
            NativeOrderType::OtcOrder => Source::OtcOrder,
            NativeOrderType::LimitOrder => Source::LimitOrder,
        };

        let fill = Fill {
            id: fill_id.clone(),
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            log_index: Some(ctx.log_index),
            source,
            // Native fills have no sender; the transform filter relies on that.
            sender: None,
            recipient: Some(event.taker),
            provider: Some(event.maker),
            input_token: event.taker_token,
            output_token: event.maker_token,
            input_token_amount: event.taker_token_filled_amount.clone(),
            output_token_amount: event.maker_token_filled_amount.clone(),
        };
        store.save_fill(fill);
        tx.fills.push(fill_id.clone());
        store.save_transaction(tx.clone());

        store.save_native_order_fill(NativeOrderFill {
            id: fill_id,
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            order_type,
            order_hash: event.order_hash.clone(),
            maker: event.maker,
            taker: event.taker,
            input_token: event.taker_token,
            output_token: event.maker_token,
            input_token_amount: event.taker_token_filled_amount.clone(),
            output_token_amount: event.maker_token_filled_amount.clone(),
            pool: event.pool.clone().unwrap_or_default(),
            fee: event.protocol_fee_paid.clone().unwrap_or_else(|| BigInt::from(0)),
        });

        self.volumes.apply_native_order_volumes(
            store,
            order_type,
            event.taker_token,
            &event.taker_token_filled_amount,
            event.maker_token,
            &event.maker_token_filled_amount,
        );
        self.volumes
            .record_native_order_fill(store, event.maker, event.taker);
        Ok(())
    }

    pub fn handle_erc721_order_filled<S: SwapStore>(
        &self,
        store: &mut S,
        event: &Erc721OrderFilledEvent,
    ) -> Result<()> {
        let ctx = &event.context;
        debug!("found erc721 order filled in tx {}", ctx.transaction_hash);

        let (tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = Swap::event_id(&tx.id, ctx.log_index);
        if store.load_erc721_order_fill(&fill_id).is_some() {
            return Ok(());
        }

        store.token_find_or_create(event.erc20_token);
        let (nft, _) = store.nft_token_find_or_create(event.erc721_token, &event.erc721_token_id, false);

        store.save_erc721_order_fill(Erc721OrderFill {
            id: fill_id,
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            erc20_token: event.erc20_token,
            erc20_token_amount: event.erc20_token_amount.clone(),
            erc721_token: nft.id,
            trade_direction: if event.direction == 0 {
                TradeDirection::Buy
            } else {
                TradeDirection::Sell
            },
            nonce: event.nonce.clone(),
        });

        self.volumes
            .record_nft_order_fill(store, event.maker, event.taker, false);
        Ok(())
    }

    pub fn handle_erc1155_order_filled<S: SwapStore>(
        &self,
        store: &mut S,
        event: &Erc1155OrderFilledEvent,
    ) -> Result<()> {
        let ctx = &event.context;
        debug!("found erc1155 order filled in tx {}", ctx.transaction_hash);

        let (tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = Swap::event_id(&tx.id, ctx.log_index);
        if store.load_erc1155_order_fill(&fill_id).is_some() {
            return Ok(());
        }

        store.token_find_or_create(event.erc20_token);
        let (nft, _) =
            store.nft_token_find_or_create(event.erc1155_token, &event.erc1155_token_id, true);

        store.save_erc1155_order_fill(Erc1155OrderFill {
            id: fill_id,
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            erc20_token: event.erc20_token,
            erc20_token_amount: event.erc20_fill_amount.clone(),
            erc1155_token: nft.id,
            erc1155_token_amount: event.erc1155_fill_amount.clone(),
            trade_direction: if event.direction == 0 {
                TradeDirection::Buy
            } else {
                TradeDirection::Sell
            },
            nonce: event.nonce.clone(),
        });

        self.volumes
            .record_nft_order_fill(store, event.maker, event.taker, true);
        Ok(())
    }

    pub fn handle_sell_to_uniswap<S: SwapStore>(
        &self,
        store: &mut S,
        call: &SellToUniswapCall,
    ) -> Result<()> {
        let source = if call.is_sushi {
            Source::Sushiswap
        } else {
            Source::UniswapV2
        };
        self.handle_uniswap_vip_call(store, call, source, SwapMethod::UniswapVip)
    }

    pub fn handle_sell_to_pancake_swap<S: SwapStore>(
        &self,
        store: &mut S,
        call: &SellToUniswapCall,
    ) -> Result<()> {
        self.handle_uniswap_vip_call(store, call, Source::PancakeSwap, SwapMethod::PancakeSwapVip)
    }

    fn handle_uniswap_vip_call<S: SwapStore>(
        &self,
        store: &mut S,
        call: &SellToUniswapCall,
        source: Source,
        method: SwapMethod,
    ) -> Result<()> {
        let ctx = &call.context;
        debug!("found {} swap in tx {}", method, ctx.transaction_hash);

        if call.tokens.len() < 2 {
            return Ok(());
        }

        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let swap_id = Swap::call_id(&tx.id, ctx.call_index);
        if store.load_swap(&swap_id).is_some() {
            debug!("swap {} already recorded, skipping replay", swap_id);
            return Ok(());
        }

        let wrapped = self.network.wrapped_native_token;
        let input_token = normalize_token_address(call.tokens[0], wrapped);
        let output_token = normalize_token_address(*call.tokens.last().unwrap(), wrapped);

        let matched =
            matching::find_vip_fills(store, &tx, &source, &self.network, &input_token, &output_token);
        if matched.is_empty() {
            // No fills means the call reverted; nothing to record.
            return Ok(());
        }

        let (_, volumes) = matching::assemble_swap(
            store,
            &mut tx,
            method,
            SwapPosition::Call {
                call_index: ctx.call_index,
            },
            &matched.fills,
            input_token,
            output_token,
            call.sell_amount.clone(),
            call.buy_amount.clone(),
            ctx.from,
            Some(source.to_string()),
        );
        self.volumes.apply_swap_volumes(store, &volumes);
        self.volumes.record_swap(store, ctx.from);
        Ok(())
    }

    pub fn handle_sell_to_uniswap_v3<S: SwapStore>(
        &self,
        store: &mut S,
        call: &SellToUniswapV3Call,
        kind: UniswapV3CallKind,
    ) -> Result<()> {
        let ctx = &call.context;
        debug!("found sellToUniswapV3 swap in tx {}", ctx.transaction_hash);

        let path = matching::decode_v3_token_path(&call.encoded_path);
        if path.len() < 2 {
            return Ok(());
        }

        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let swap_id = Swap::call_id(&tx.id, ctx.call_index);
        if store.load_swap(&swap_id).is_some() {
            debug!("swap {} already recorded, skipping replay", swap_id);
            return Ok(());
        }

        let wrapped = self.network.wrapped_native_token;
        let input_token = normalize_token_address(path[0], wrapped);
        let output_token = normalize_token_address(*path.last().unwrap(), wrapped);

        let matched = matching::find_vip_fills(
            store,
            &tx,
            &Source::UniswapV3,
            &self.network,
            &input_token,
            &output_token,
        );
        if matched.is_empty() {
            // No fills means the call reverted; nothing to record.
            return Ok(());
        }

        // The ETH-input variant has no sell amount parameter: use the
        // transaction value for direct EOA calls, otherwise fall back to the
        // first matched fill's input amount.
        let input_amount = match (kind, &call.sell_amount) {
            (UniswapV3CallKind::EthForToken, _) => {
                if ctx.from == ctx.transaction_from {
                    ctx.transaction_value.clone()
                } else {
                    matched.fills[0].input_token_amount.clone()
                }
            }
            (_, Some(sell_amount)) => sell_amount.clone(),
            (_, None) => matched.fills[0].input_token_amount.clone(),
        };

        let (_, volumes) = matching::assemble_swap(
            store,
            &mut tx,
            SwapMethod::UniswapV3Vip,
            SwapPosition::Call {
                call_index: ctx.call_index,
            },
            &matched.fills,
            input_token,
            output_token,
            input_amount,
            call.buy_amount.clone(),
            ctx.from,
            None,
        );
        self.volumes.apply_swap_volumes(store, &volumes);
        self.volumes.record_swap(store, ctx.from);
        Ok(())
    }
}

//! Token, taker and maker aggregate updates.
//!
//! Handlers compute what happened; this module owns the bookkeeping driven
//! by it. Every method is a plain read-modify-write against the store so the
//! matching engine itself stays side-effect free on aggregates.

use num_bigint::BigInt;
use tracing::debug;

use super::exchange_proxy::matching::SwapVolumes;
use crate::store::models::NativeOrderType;
use crate::store::SwapStore;
use crate::utils::Address;

pub struct VolumeCalculator;

impl VolumeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Add an assembled swap's amounts to both tokens' swap volume.
    pub fn apply_swap_volumes<S: SwapStore>(&self, store: &mut S, volumes: &SwapVolumes) {
        let (mut input_token, _) = store.token_find_or_create(volumes.input_token);
        input_token.swap_volume += &volumes.input_amount;
        store.save_token(input_token);

        let (mut output_token, _) = store.token_find_or_create(volumes.output_token);
        output_token.swap_volume += &volumes.output_amount;
        store.save_token(output_token);

        debug!(
            "volume {} {} -> {} {}",
            volumes.input_amount, volumes.input_token, volumes.output_amount, volumes.output_token
        );
    }

    /// Add a native order fill's amounts to the per-kind token volumes.
    pub fn apply_native_order_volumes<S: SwapStore>(
        &self,
        store: &mut S,
        order_type: NativeOrderType,
        input_token: Address,
        input_amount: &BigInt,
        output_token: Address,
        output_amount: &BigInt,
    ) {
        let (mut input, _) = store.token_find_or_create(input_token);
        let (mut output, _) = store.token_find_or_create(output_token);
        match order_type {
            NativeOrderType::RfqOrder => {
                input.rfq_order_volume += input_amount;
                output.rfq_order_volume += output_amount;
            }
            NativeOrderType::OtcOrder => {
                input.otc_order_volume += input_amount;
                output.otc_order_volume += output_amount;
            }
            NativeOrderType::LimitOrder => {
                input.limit_order_volume += input_amount;
                output.limit_order_volume += output_amount;
            }
        }
        store.save_token(input);
        store.save_token(output);
    }

    /// Count one assembled swap against its taker.
    pub fn record_swap<S: SwapStore>(&self, store: &mut S, taker: Address) {
        let (mut taker, _) = store.taker_find_or_create(taker);
        taker.swap_count += 1;
        store.save_taker(taker);
    }

    /// Count one native order fill against its maker and taker.
    pub fn record_native_order_fill<S: SwapStore>(
        &self,
        store: &mut S,
        maker: Address,
        taker: Address,
    ) {
        let (mut maker, _) = store.maker_find_or_create(maker);
        maker.native_order_fill_count += 1;
        store.save_maker(maker);

        let (mut taker, _) = store.taker_find_or_create(taker);
        taker.native_order_fill_count += 1;
        store.save_taker(taker);
    }

    /// Count one NFT order fill against its maker and taker.
    pub fn record_nft_order_fill<S: SwapStore>(
        &self,
        store: &mut S,
        maker: Address,
        taker: Address,
        is_erc1155: bool,
    ) {
        let (mut maker, _) = store.maker_find_or_create(maker);
        let (mut taker, _) = store.taker_find_or_create(taker);
        if is_erc1155 {
            maker.erc1155_order_fill_count += 1;
            taker.erc1155_order_fill_count += 1;
        } else {
            maker.erc721_order_fill_count += 1;
            taker.erc721_order_fill_count += 1;
        }
        store.save_maker(maker);
        store.save_taker(taker);
    }
}

impl Default for VolumeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

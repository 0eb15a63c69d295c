use anyhow::Result;
use tracing::{debug, warn};

use crate::config::NetworkConfig;
use crate::processors::events::normalized::{
    BridgeFillEvent, Erc20BridgeTransferEvent, LegacyBridgeFillEvent,
};
use crate::store::models::{Fill, Source};
use crate::store::SwapStore;

/// Map a legacy bridge fill's numeric source id onto its venue tag.
pub fn legacy_bridge_source(source_id: u32) -> Source {
    match source_id {
        0 => Source::Balancer,
        1 => Source::Bancor,
        2 => Source::CoFiX,
        3 => Source::Curve,
        4 => Source::Cream,
        5 => Source::CryptoCom,
        6 => Source::Dodo,
        7 => Source::Kyber,
        8 => Source::LiquidityProvider,
        9 => Source::Mooniswap,
        10 => Source::MStable,
        11 => Source::Oasis,
        12 => Source::Shell,
        13 => Source::Snowswap,
        14 => Source::Sushiswap,
        15 => Source::Swerve,
        16 => Source::Uniswap,
        17 => Source::UniswapV2,
        18 => Source::Dodov2,
        19 => Source::Linkswap,
        _ => {
            warn!("encountered unknown BridgeFill source ID: {}", source_id);
            Source::Unknown
        }
    }
}

/// Venue tag from a modern bridge fill's 32-byte source field: the upper 16
/// bytes carry a protocol id, the lower 16 an ASCII venue name.
pub fn bridge_fill_source(source: &[u8]) -> Source {
    let name_bytes = if source.len() >= 16 { &source[16..] } else { source };
    let name: String = name_bytes
        .iter()
        .filter(|b| **b != 0)
        .map(|b| *b as char)
        .collect();
    if name.is_empty() {
        Source::Unknown
    } else {
        // EnumString with a default variant never fails
        name.parse().unwrap_or(Source::Other(name))
    }
}

/// Records transformer bridge fills. Each event is one already-executed
/// venue trade paying out to the flash wallet; anything emitted elsewhere
/// is spoofable and ignored.
pub struct TransformersProcessor {
    network: NetworkConfig,
}

impl TransformersProcessor {
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    pub fn handle_bridge_fill<S: SwapStore>(&self, store: &mut S, event: &BridgeFillEvent) -> Result<()> {
        let ctx = &event.context;
        // Event must come from the flash wallet.
        if ctx.address != self.network.flash_wallet {
            return Ok(());
        }

        let source = bridge_fill_source(&event.source);
        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = format!("{}-BridgeFill({})-{}", tx.id, source, ctx.log_index);
        if store.load_fill(&fill_id).is_some() {
            debug!("fill {} already recorded, skipping replay", fill_id);
            return Ok(());
        }

        let fill = Fill {
            id: fill_id.clone(),
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            log_index: Some(ctx.log_index),
            source,
            sender: Some(self.network.exchange_proxy),
            recipient: Some(self.network.flash_wallet),
            provider: None,
            input_token: event.input_token,
            output_token: event.output_token,
            input_token_amount: event.input_token_amount.clone(),
            output_token_amount: event.output_token_amount.clone(),
        };
        store.save_fill(fill);
        tx.fills.push(fill_id);
        store.save_transaction(tx);
        Ok(())
    }

    pub fn handle_legacy_bridge_fill<S: SwapStore>(
        &self,
        store: &mut S,
        event: &LegacyBridgeFillEvent,
    ) -> Result<()> {
        let ctx = &event.context;
        // Event must come from the flash wallet.
        if ctx.address != self.network.flash_wallet {
            return Ok(());
        }

        let source = legacy_bridge_source(event.source_id);
        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = format!("{}-LegacyBridgeFill({})-{}", tx.id, source, ctx.log_index);
        if store.load_fill(&fill_id).is_some() {
            debug!("fill {} already recorded, skipping replay", fill_id);
            return Ok(());
        }

        let fill = Fill {
            id: fill_id.clone(),
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            log_index: Some(ctx.log_index),
            source,
            sender: Some(self.network.exchange_proxy),
            recipient: Some(self.network.flash_wallet),
            provider: None,
            input_token: event.input_token,
            output_token: event.output_token,
            input_token_amount: event.input_token_amount.clone(),
            output_token_amount: event.output_token_amount.clone(),
        };
        store.save_fill(fill);
        tx.fills.push(fill_id);
        store.save_transaction(tx);
        Ok(())
    }

    pub fn handle_erc20_bridge_transfer<S: SwapStore>(
        &self,
        store: &mut S,
        event: &Erc20BridgeTransferEvent,
    ) -> Result<()> {
        let ctx = &event.context;
        // Event must come from the flash wallet.
        if ctx.address != self.network.flash_wallet {
            return Ok(());
        }

        let source = Source::Other(event.from.to_hex());
        let (mut tx, _) =
            store.transaction_find_or_create(&ctx.transaction_hash, ctx.block_number, ctx.block_timestamp);
        let fill_id = format!("{}-ERC20BridgeTransfer({})-{}", tx.id, source, ctx.log_index);
        if store.load_fill(&fill_id).is_some() {
            debug!("fill {} already recorded, skipping replay", fill_id);
            return Ok(());
        }

        let fill = Fill {
            id: fill_id.clone(),
            transaction: tx.id.clone(),
            block_number: tx.block_number,
            timestamp: tx.timestamp,
            log_index: Some(ctx.log_index),
            source,
            sender: Some(self.network.exchange_proxy),
            recipient: Some(self.network.flash_wallet),
            provider: Some(event.from),
            input_token: event.input_token,
            output_token: event.output_token,
            input_token_amount: event.input_token_amount.clone(),
            output_token_amount: event.output_token_amount.clone(),
        };
        store.save_fill(fill);
        tx.fills.push(fill_id);
        store.save_transaction(tx);
        Ok(())
    }
}

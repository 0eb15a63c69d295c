use std::sync::mpsc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

use crate::config::NetworkConfig;
use crate::processors::events::exchange_proxy::ExchangeProxyProcessor;
use crate::processors::events::normalized::{ExchangeEvent, UniswapV3CallKind};
use crate::processors::events::transformers::TransformersProcessor;
use crate::processors::events::uniswap_v2::UniswapV2Processor;
use crate::processors::events::uniswap_v3::UniswapV3Processor;
use crate::store::models::NativeOrderType;
use crate::store::SwapStore;
use crate::utils::processor_trait::{EventBatchProcessor, ProcessorName};

/// Outcome of one processed batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub processed: usize,
    pub failed: usize,
}

/// The orchestrator: owns the store and the protocol processors, and feeds
/// each normalized event to the handler that owns it, strictly in stream
/// order. A handler error is confined to its event; the rest of the batch
/// continues.
pub struct SwapProcessor<S: SwapStore> {
    store: S,
    exchange_proxy: ExchangeProxyProcessor,
    uniswap_v2: UniswapV2Processor,
    uniswap_v3: UniswapV3Processor,
    transformers: TransformersProcessor,
    sender: Option<mpsc::Sender<String>>,
}

impl<S: SwapStore> SwapProcessor<S> {
    pub fn new(network: NetworkConfig, store: S, sender: Option<mpsc::Sender<String>>) -> Self {
        info!("🚀 Creating SwapProcessor for network {}", network.network);
        Self {
            store,
            exchange_proxy: ExchangeProxyProcessor::new(network.clone()),
            uniswap_v2: UniswapV2Processor::new(network.clone()),
            uniswap_v3: UniswapV3Processor::new(network.clone()),
            transformers: TransformersProcessor::new(network),
            sender,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn handle_event(&mut self, event: &ExchangeEvent) -> Result<()> {
        let store = &mut self.store;
        match event {
            ExchangeEvent::TransformedErc20(e) => {
                self.exchange_proxy.handle_transformed_erc20(store, e)
            }
            ExchangeEvent::LiquidityProviderSwap(e) => {
                self.exchange_proxy.handle_liquidity_provider_swap(store, e)
            }
            ExchangeEvent::RfqOrderFilled(e) => {
                self.exchange_proxy
                    .handle_native_order_filled(store, e, NativeOrderType::RfqOrder)
            }
            ExchangeEvent::OtcOrderFilled(e) => {
                self.exchange_proxy
                    .handle_native_order_filled(store, e, NativeOrderType::OtcOrder)
            }
            ExchangeEvent::LimitOrderFilled(e) => {
                self.exchange_proxy
                    .handle_native_order_filled(store, e, NativeOrderType::LimitOrder)
            }
            ExchangeEvent::Erc721OrderFilled(e) => {
                self.exchange_proxy.handle_erc721_order_filled(store, e)
            }
            ExchangeEvent::Erc1155OrderFilled(e) => {
                self.exchange_proxy.handle_erc1155_order_filled(store, e)
            }
            ExchangeEvent::UniswapPairSwap(e) => self.uniswap_v2.handle_pair_swap(store, e),
            ExchangeEvent::UniswapV3PoolSwap(e) => self.uniswap_v3.handle_pool_swap(store, e),
            ExchangeEvent::BridgeFill(e) => self.transformers.handle_bridge_fill(store, e),
            ExchangeEvent::LegacyBridgeFill(e) => {
                self.transformers.handle_legacy_bridge_fill(store, e)
            }
            ExchangeEvent::Erc20BridgeTransfer(e) => {
                self.transformers.handle_erc20_bridge_transfer(store, e)
            }
            ExchangeEvent::SellToUniswap(c) => self.exchange_proxy.handle_sell_to_uniswap(store, c),
            ExchangeEvent::SellToPancakeSwap(c) => {
                self.exchange_proxy.handle_sell_to_pancake_swap(store, c)
            }
            ExchangeEvent::SellTokenForTokenToUniswapV3(c) => self
                .exchange_proxy
                .handle_sell_to_uniswap_v3(store, c, UniswapV3CallKind::TokenForToken),
            ExchangeEvent::SellEthForTokenToUniswapV3(c) => self
                .exchange_proxy
                .handle_sell_to_uniswap_v3(store, c, UniswapV3CallKind::EthForToken),
            ExchangeEvent::SellTokenForEthToUniswapV3(c) => self
                .exchange_proxy
                .handle_sell_to_uniswap_v3(store, c, UniswapV3CallKind::TokenForEth),
        }
    }

    /// Process events synchronously in delivery order. Handler failures are
    /// logged and counted, never propagated: one bad event must not take
    /// down the rest of the stream.
    pub fn process_events(&mut self, events: &[ExchangeEvent]) -> BatchStats {
        let mut stats = BatchStats::default();
        for event in events {
            match self.handle_event(event) {
                Ok(()) => stats.processed += 1,
                Err(e) => {
                    error!(
                        "❌ failed to process {} event in tx {}: {e:#}",
                        event.kind(),
                        event.transaction_hash()
                    );
                    stats.failed += 1;
                }
            }
        }
        stats
    }

    fn notify(&self, message: String) {
        if let Some(sender) = &self.sender {
            // Receiver going away is not this side's problem
            let _ = sender.send(message);
        }
    }
}

impl<S: SwapStore> ProcessorName for SwapProcessor<S> {
    fn name(&self) -> String {
        "SwapProcessor".to_string()
    }
}

#[async_trait]
impl<S: SwapStore + Send> EventBatchProcessor for SwapProcessor<S> {
    async fn process_batch(&mut self, events: Vec<ExchangeEvent>) -> Result<BatchStats> {
        let stats = self.process_events(&events);
        self.notify(format!(
            "processed {} events ({} failed)",
            stats.processed, stats.failed
        ));
        Ok(stats)
    }
}

use anyhow::Result;
use async_trait::async_trait;

use crate::processors::events::normalized::ExchangeEvent;
use crate::processors::swap_processor::BatchStats;

pub trait ProcessorName {
    fn name(&self) -> String;
}

/// One step of the run loop: consume a batch of normalized events in stream
/// order and report how many were processed.
#[async_trait]
pub trait EventBatchProcessor: ProcessorName {
    async fn process_batch(&mut self, events: Vec<ExchangeEvent>) -> Result<BatchStats>;
}

/// Pair swap events recorded as fills
pub mod processor;

pub use processor::UniswapV2Processor;

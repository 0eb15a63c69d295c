/// Pool swap events recorded as fills
pub mod processor;

pub use processor::UniswapV3Processor;

pub mod normalized;

pub mod exchange_proxy;
pub mod transformers;
pub mod uniswap_v2;
pub mod uniswap_v3;
pub mod volume_calculator;

// Re-export main components
pub use volume_calculator::VolumeCalculator;

/// Bridge fill events recorded as fills
pub mod processor;

pub use processor::TransformersProcessor;

pub mod caption;
pub mod location;
pub mod utils;

pub use caption::{run, CaptionClient, CaptionConfig, CaptionError, PipelineOutcome};

pub mod accumulator;
pub mod client;
pub mod config;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod recorder;

pub use accumulator::FragmentAccumulator;
pub use client::CaptionClient;
pub use config::CaptionConfig;
pub use model::{CaptionError, CaptionFragment};
pub use pipeline::{run, PipelineOutcome};

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use tracing::{error, info, warn};

use crate::caption::client::CaptionClient;
use crate::caption::config::CaptionConfig;
use crate::caption::loader;
use crate::caption::model::CaptionError;
use crate::caption::recorder;

/// How one pipeline run ended
///
/// Everything except a persistence failure is an ordinary outcome; the
/// process continues gracefully and nothing bogus reaches the caption log.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// A caption was produced and appended to the log
    Captioned(String),

    /// The image path did not exist; no HTTP call, no log write
    SkippedMissingImage,

    /// The service produced only whitespace; nothing worth logging
    EmptyCaption,

    /// The captioning attempt failed; the log is untouched
    CaptionFailed(CaptionError),
}

/// Runs the capture-to-log pipeline once: load and encode the image, request
/// a caption from the service, append the result to the caption log
///
/// # Arguments
/// * `image_path` - image file produced by the capture step
/// * `log_path` - append-only caption log
/// * `config` - captioning service configuration
///
/// # Returns
/// * `Ok(outcome)` - how the run ended; only log-write failures are `Err`
pub async fn run(
    image_path: &Path,
    log_path: &Path,
    config: &CaptionConfig,
) -> Result<PipelineOutcome> {
    info!("Processing image: {}", image_path.display());

    let encoded = match loader::encode_image(image_path)? {
        Some(encoded) => encoded,
        None => {
            warn!("No image found to process");
            return Ok(PipelineOutcome::SkippedMissingImage);
        }
    };

    let client = CaptionClient::new(config.clone())?;
    match client.describe(&encoded).await {
        Ok(caption) if caption.is_empty() => {
            warn!("Captioning service returned an empty caption; skipping log write");
            Ok(PipelineOutcome::EmptyCaption)
        }
        Ok(caption) => {
            info!("Generated description: {}", caption);
            recorder::append_caption(log_path, &caption, Local::now())?;
            Ok(PipelineOutcome::Captioned(caption))
        }
        Err(e) => {
            error!("Failed to get a description: {}", e);
            Ok(PipelineOutcome::CaptionFailed(e))
        }
    }
}

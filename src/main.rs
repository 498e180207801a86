use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use photo_captioner::caption::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PROMPT};
use photo_captioner::caption::{self, CaptionConfig, PipelineOutcome};
use photo_captioner::location;
use photo_captioner::utils::logger::init_logger;

/// Captions a captured photo via a locally running image-captioning service
/// and appends the result to a caption log.
#[derive(Debug, Parser)]
#[command(name = "photo_captioner", version)]
struct Args {
    /// Path of the captured photo to caption
    #[arg(default_value = "captured_photo.jpg")]
    image: PathBuf,

    /// Append-only caption log file
    #[arg(long, default_value = "captions.txt")]
    caption_log: PathBuf,

    /// Generate endpoint of the captioning service
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model identifier to request
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Prompt sent alongside the image
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Timeout for the captioning request, in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Skip the IP-based location lookup
    #[arg(long)]
    skip_location: bool,

    /// Directory for diagnostic log files
    #[arg(long, default_value = "logs")]
    log_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _ = init_logger(&args.log_dir);

    if !args.skip_location {
        println!("Ensure location services are enabled and permitted for this application.");
        match location::lookup(location::IPINFO_URL).await {
            Ok(loc) => println!("Approximate location: {}", loc),
            Err(e) => {
                warn!("Location lookup failed: {}", e);
                println!("Could not determine location from IP: {}", e);
            }
        }
    }

    let config = CaptionConfig {
        endpoint: args.endpoint,
        model: args.model,
        prompt: args.prompt,
        request_timeout: Duration::from_secs(args.timeout_secs),
    };

    // Only a log-write failure is fatal; everything else is reported and the
    // process exits cleanly.
    match caption::run(&args.image, &args.caption_log, &config).await? {
        PipelineOutcome::Captioned(caption) => {
            println!("Generated description: {}", caption);
            println!("Caption written to '{}'.", args.caption_log.display());
        }
        PipelineOutcome::SkippedMissingImage => {
            println!(
                "No {} found. Please check the image capture process.",
                args.image.display()
            );
        }
        PipelineOutcome::EmptyCaption => {
            println!("The captioning service returned an empty caption; nothing logged.");
        }
        PipelineOutcome::CaptionFailed(e) => {
            println!("Failed to get a description: {}", e);
        }
    }

    Ok(())
}

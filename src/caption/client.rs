use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::StatusCode;
use tracing::{debug, error, info, trace};

use crate::caption::accumulator::FragmentAccumulator;
use crate::caption::config::CaptionConfig;
use crate::caption::model::{CaptionError, GenerateRequest};

/// Client for the local image-captioning service
///
/// Sends one image per call and consumes the newline-delimited JSON stream
/// the service produces. All failures come back as `CaptionError` values
/// rather than captions, so a caller can always tell the two apart.
pub struct CaptionClient {
    http: reqwest::Client,
    config: CaptionConfig,
}

impl CaptionClient {
    /// Creates a client with the given configuration
    ///
    /// The underlying HTTP client carries a request timeout covering the
    /// whole exchange, streamed body included; the captioning service is an
    /// untrusted local dependency and must not be able to block us forever.
    pub fn new(config: CaptionConfig) -> Result<Self> {
        debug!(
            "Creating caption client for {} (model: {}, timeout: {:?})",
            config.endpoint, config.model, config.request_timeout
        );
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    /// Requests a caption for a base64-encoded image
    ///
    /// # Arguments
    /// * `image_base64` - the image bytes as base64 text
    ///
    /// # Returns
    /// * `Ok(caption)` - the trimmed concatenation of all streamed fragments
    /// * `Err(CaptionError)` - transport failure, non-200 status, or a
    ///   malformed response line
    pub async fn describe(&self, image_base64: &str) -> Result<String, CaptionError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt: &self.config.prompt,
            images: vec![image_base64],
        };

        info!("Sending caption request to {}", self.config.endpoint);
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!("Captioning service returned status {}: {}", status, body);
            return Err(CaptionError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut accumulator = FragmentAccumulator::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            trace!("Received {} byte chunk", chunk.len());
            accumulator.push_chunk(&chunk)?;
            if accumulator.is_done() {
                break;
            }
        }

        let caption = accumulator.finish()?;
        info!("Full caption response: {}", caption);
        Ok(caption)
    }
}

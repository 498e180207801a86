use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body for the captioning service's generate endpoint
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    /// Model identifier (e.g. "llava")
    pub model: &'a str,

    /// Prompt text describing what to do with the image
    pub prompt: &'a str,

    /// Base64-encoded images; this pipeline always sends exactly one
    pub images: Vec<&'a str>,
}

/// One decoded object from the newline-delimited streaming response
#[derive(Debug, Deserialize)]
pub struct CaptionFragment {
    /// Partial caption text; absent fields decode as empty
    #[serde(default)]
    pub response: String,

    /// Terminal marker; the stream is complete once this is true
    #[serde(default)]
    pub done: bool,
}

/// Failure modes of a captioning attempt
///
/// These are deliberately a tagged type rather than error strings so a caller
/// can never mistake a failure for a real caption and persist it.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// The request could not be sent or the response body could not be read
    #[error("could not reach captioning service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-200 status
    #[error("captioning service returned status {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    /// A response line was not valid JSON; the whole attempt is aborted
    /// rather than skipping the line, which would silently truncate the
    /// accumulated caption
    #[error("invalid JSON in response line {line:?}: {source}")]
    MalformedFragment {
        line: String,
        source: serde_json::Error,
    },
}

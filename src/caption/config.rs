use std::time::Duration;

// Defaults for the local captioning service
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llava";
pub const DEFAULT_PROMPT: &str = "What's in this image?";

// The service streams tokens as it generates them, so the whole call can run
// for a while on slow hardware. The timeout bounds the entire request
// including the streamed body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the caption client
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// Generate endpoint of the captioning service
    pub endpoint: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Prompt text sent alongside the image
    pub prompt: String,

    /// Upper bound on the full request/response exchange
    pub request_timeout: Duration,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

use tracing::{debug, trace, warn};

use crate::caption::model::{CaptionError, CaptionFragment};

/// Incremental line-delimited JSON accumulator for the streaming response
///
/// The transport hands over raw byte chunks in whatever sizes the network
/// produces; chunk boundaries need not align with line boundaries. This type
/// buffers bytes, splits out complete lines, parses each as a
/// `CaptionFragment`, and concatenates the `response` fields in arrival
/// order. Keeping it independent of any HTTP client makes the protocol logic
/// testable with synthetic byte streams.
#[derive(Debug, Default)]
pub struct FragmentAccumulator {
    buf: Vec<u8>,
    text: String,
    done: bool,
}

impl FragmentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a fragment with `done: true` has been seen; the caller can
    /// stop pulling from the transport
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds one chunk of raw response bytes into the accumulator
    ///
    /// Every complete line in the buffer is consumed. A line that fails to
    /// parse as JSON aborts the whole attempt with
    /// `CaptionError::MalformedFragment`. Chunks arriving after the terminal
    /// fragment are ignored.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), CaptionError> {
        if self.done {
            trace!("Ignoring {} bytes received after terminal fragment", chunk.len());
            return Ok(());
        }

        self.buf.extend_from_slice(chunk);

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.consume_line(&line[..pos])?;
            if self.done {
                break;
            }
        }

        Ok(())
    }

    /// Flushes any trailing partial line and returns the trimmed caption
    ///
    /// A stream that ends without ever reporting `done: true` is treated as
    /// complete with whatever text accumulated so far.
    pub fn finish(mut self) -> Result<String, CaptionError> {
        if !self.done && !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            self.consume_line(&line)?;
        }

        if !self.done {
            warn!("Response stream ended without a terminal fragment; keeping accumulated text");
        }

        Ok(self.text.trim().to_string())
    }

    fn consume_line(&mut self, line: &[u8]) -> Result<(), CaptionError> {
        let trimmed = trim_ascii(line);
        if trimmed.is_empty() {
            return Ok(());
        }

        trace!("Raw response line: {}", String::from_utf8_lossy(trimmed));
        let fragment: CaptionFragment =
            serde_json::from_slice(trimmed).map_err(|source| CaptionError::MalformedFragment {
                line: String::from_utf8_lossy(trimmed).into_owned(),
                source,
            })?;

        self.text.push_str(&fragment.response);
        if fragment.done {
            debug!("Terminal fragment received after {} accumulated bytes", self.text.len());
            self.done = true;
        }

        Ok(())
    }
}

// Strips leading/trailing ASCII whitespace, including the \r of CRLF lines.
fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &bytes[start..end]
}

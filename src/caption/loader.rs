use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads an image from disk and base64-encodes it for the captioning request
///
/// # Returns
/// * `Ok(Some(encoded))` - the file's bytes as base64 text
/// * `Ok(None)` - the path does not exist; the caller must skip the pipeline
/// * `Err(_)` - the path exists but could not be read
pub fn encode_image(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        warn!("Image path does not exist: {}", path.display());
        return Ok(None);
    }

    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(Some(BASE64.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("photo_captioner_{}_{}", Uuid::new_v4(), name))
    }

    #[test]
    fn test_missing_path_returns_none() {
        let path = temp_path("does_not_exist.jpg");
        let result = encode_image(&path).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_encode_round_trips() {
        let path = temp_path("round_trip.jpg");
        let bytes: Vec<u8> = (0u8..=255).collect();
        fs::write(&path, &bytes).unwrap();

        let encoded = encode_image(&path).unwrap().expect("file exists");
        let decoded = BASE64.decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded, bytes);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_file_encodes_to_empty_string() {
        let path = temp_path("empty.jpg");
        fs::write(&path, b"").unwrap();

        let encoded = encode_image(&path).unwrap().expect("file exists");
        assert_eq!(encoded, "");

        fs::remove_file(&path).unwrap();
    }
}

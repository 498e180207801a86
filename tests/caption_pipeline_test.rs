use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use photo_captioner::caption::{self, CaptionConfig, CaptionError, PipelineOutcome};

struct TestDirs {
    image: PathBuf,
    log: PathBuf,
}

impl TestDirs {
    fn new() -> Self {
        let base = std::env::temp_dir().join(format!("photo_captioner_it_{}", Uuid::new_v4()));
        fs::create_dir_all(&base).unwrap();
        Self {
            image: base.join("photo.jpg"),
            log: base.join("captions.txt"),
        }
    }
}

impl Drop for TestDirs {
    fn drop(&mut self) {
        if let Some(base) = self.image.parent() {
            let _ = fs::remove_dir_all(base);
        }
    }
}

fn test_config(server_url: &str) -> CaptionConfig {
    CaptionConfig {
        endpoint: format!("{}/api/generate", server_url),
        ..CaptionConfig::default()
    }
}

/// Checks the `YYYY-MM-DD HH:MM:SS` prefix of a caption log line.
fn has_timestamp_prefix(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 19 {
        return false;
    }
    bytes.iter().take(19).enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ',
        13 | 16 => b == b':',
        _ => b.is_ascii_digit(),
    })
}

#[tokio::test]
async fn test_end_to_end_appends_one_caption_line() {
    let dirs = TestDirs::new();
    fs::write(&dirs.image, b"\x01\x02").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{\"response\":\"cat\",\"done\":true}\n")
        .create_async()
        .await;

    let outcome = caption::run(&dirs.image, &dirs.log, &test_config(&server.url()))
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::Captioned(caption) => assert_eq!(caption, "cat"),
        other => panic!("expected Captioned, got {:?}", other),
    }

    let contents = fs::read_to_string(&dirs.log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(has_timestamp_prefix(lines[0]), "bad line: {}", lines[0]);
    assert!(lines[0].ends_with(": cat"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_multi_fragment_stream_is_concatenated() {
    let dirs = TestDirs::new();
    fs::write(&dirs.image, b"fake jpeg bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(
            "{\"response\":\"a red \",\"done\":false}\n\
             {\"response\":\"bicycle \",\"done\":false}\n\
             {\"response\":\"leaning on a wall\",\"done\":true}\n",
        )
        .create_async()
        .await;

    let outcome = caption::run(&dirs.image, &dirs.log, &test_config(&server.url()))
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::Captioned(caption) => {
            assert_eq!(caption, "a red bicycle leaning on a wall")
        }
        other => panic!("expected Captioned, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_image_makes_no_http_call_and_no_log() {
    let dirs = TestDirs::new();
    // No image file written

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .expect(0)
        .create_async()
        .await;

    let outcome = caption::run(&dirs.image, &dirs.log, &test_config(&server.url()))
        .await
        .unwrap();

    assert!(matches!(outcome, PipelineOutcome::SkippedMissingImage));
    assert!(!dirs.log.exists());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_error_leaves_log_untouched() {
    let dirs = TestDirs::new();
    fs::write(&dirs.image, b"fake jpeg bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let outcome = caption::run(&dirs.image, &dirs.log, &test_config(&server.url()))
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::CaptionFailed(CaptionError::ServiceStatus { status, .. }) => {
            assert_eq!(status, 503)
        }
        other => panic!("expected ServiceStatus failure, got {:?}", other),
    }
    assert!(!dirs.log.exists());
}

#[tokio::test]
async fn test_malformed_fragment_leaves_log_untouched() {
    let dirs = TestDirs::new();
    fs::write(&dirs.image, b"fake jpeg bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{\"response\":\"good\",\"done\":false}\n<html>oops</html>\n")
        .create_async()
        .await;

    let outcome = caption::run(&dirs.image, &dirs.log, &test_config(&server.url()))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        PipelineOutcome::CaptionFailed(CaptionError::MalformedFragment { .. })
    ));
    assert!(!dirs.log.exists());
}

#[tokio::test]
async fn test_whitespace_only_caption_is_not_logged() {
    let dirs = TestDirs::new();
    fs::write(&dirs.image, b"fake jpeg bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{\"response\":\"   \",\"done\":true}\n")
        .create_async()
        .await;

    let outcome = caption::run(&dirs.image, &dirs.log, &test_config(&server.url()))
        .await
        .unwrap();

    assert!(matches!(outcome, PipelineOutcome::EmptyCaption));
    assert!(!dirs.log.exists());
}

#[tokio::test]
async fn test_successive_runs_append_to_the_same_log() {
    let dirs = TestDirs::new();
    fs::write(&dirs.image, b"fake jpeg bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{\"response\":\"same scene\",\"done\":true}\n")
        .expect(2)
        .create_async()
        .await;

    let config = test_config(&server.url());
    caption::run(&dirs.image, &dirs.log, &config).await.unwrap();
    caption::run(&dirs.image, &dirs.log, &config).await.unwrap();

    let contents = fs::read_to_string(&dirs.log).unwrap();
    assert_eq!(contents.lines().count(), 2);
    for line in contents.lines() {
        assert!(line.ends_with(": same scene"));
    }
}

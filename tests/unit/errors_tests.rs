/*!
 * Tests for error types and conversions
 */

use lyricsync::caption_processor::CueId;
use lyricsync::errors::{EditorError, FetchError};

#[test]
fn test_fetchError_display_shouldIncludeDetails() {
    let error = FetchError::HttpStatus {
        status_code: 404,
        url: "https://example.com/1.vtt".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Caption server responded with status 404 for https://example.com/1.vtt"
    );

    let error = FetchError::UnsupportedUrl("ftp://x".to_string());
    assert_eq!(error.to_string(), "Unsupported caption URL: ftp://x");
}

#[test]
fn test_editorError_cueNotFound_shouldNameId() {
    let id = CueId::generate();
    let error = EditorError::CueNotFound(id);
    assert_eq!(error.to_string(), format!("No cue with id {}", id));
}

#[test]
fn test_errors_intoAnyhow_shouldKeepMessage() {
    let error: anyhow::Error = FetchError::RequestFailed("timeout".to_string()).into();
    assert_eq!(error.to_string(), "Caption request failed: timeout");
    assert!(error.downcast_ref::<FetchError>().is_some());

    let error: anyhow::Error = EditorError::NoTrackSelected.into();
    assert_eq!(error.downcast_ref::<EditorError>(), Some(&EditorError::NoTrackSelected));
}

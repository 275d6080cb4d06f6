/*!
 * Error types for the lyricsync library.
 *
 * Caption handling itself is lenient and never fails; these types cover the
 * edges where something real can go wrong: fetching caption files and
 * editing cues that no longer exist. File and config glue uses `anyhow`.
 */

use thiserror::Error;

use crate::caption_processor::CueId;

/// Errors that can occur while fetching a caption file
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Caption request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status
    #[error("Caption server responded with status {status_code} for {url}")]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Requested URL
        url: String,
    },

    /// Reading a local caption file failed
    #[error("Failed to read caption file {path}: {message}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error message
        message: String,
    },

    /// The URL scheme is not handled by any caption source
    #[error("Unsupported caption URL: {0}")]
    UnsupportedUrl(String),
}

/// Errors returned by the cue authoring engine
#[derive(Error, Debug, PartialEq)]
pub enum EditorError {
    /// No cue carries the requested identity
    #[error("No cue with id {0}")]
    CueNotFound(CueId),

    /// A mutation was attempted before any track was selected
    #[error("No track selected")]
    NoTrackSelected,
}

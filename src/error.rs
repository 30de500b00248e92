/// Error types for the gallery
///
/// Errors are `Clone` because they travel inside iced messages.
/// None of them is fatal: the update loop logs them and degrades the UI.

use thiserror::Error;

/// Failure while talking to the site host (HTTP server or local directory)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// The resource does not exist (404/410 or missing file)
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status
    #[error("{url} answered with HTTP {code}")]
    Status { url: String, code: u16 },

    /// Network-level failure (DNS, connection reset, TLS, ...)
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The resource is bigger than the download cap
    #[error("{url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    /// Local filesystem failure other than "not found"
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },

    /// The blocking worker panicked or was cancelled
    #[error("task join error: {0}")]
    Join(String),
}

/// Application-level error
#[derive(Debug, Clone, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Host(#[from] HostError),

    /// The manifest was fetched but is not a valid descriptor array
    #[error("malformed manifest: {0}")]
    Manifest(String),

    /// Bytes were fetched but are not a decodable image
    #[error("failed to decode {url}: {message}")]
    Decode { url: String, message: String },

    /// The config file exists but could not be read or parsed
    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },
}

impl GalleryError {
    pub fn decode(url: &str, err: image::ImageError) -> Self {
        GalleryError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

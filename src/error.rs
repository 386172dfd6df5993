//! Error types for photo transformation.

/// Errors that can occur during intake or style transformation.
#[derive(Debug, thiserror::Error)]
pub enum GhiblifyError {
    /// Uploaded content is not an image type.
    #[error("not an image: {0}")]
    Validation(String),

    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading the photo, saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for photo transformation operations.
pub type Result<T> = std::result::Result<T, GhiblifyError>;

//! Error types for API access.

/// Error from content API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// I/O error while reading a response body.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Background request task panicked or was cancelled.
    #[error("request task failed")]
    Task(#[from] tokio::task::JoinError),

    /// Client configuration is incomplete.
    #[error("invalid client configuration")]
    Config(#[from] quire_config::ConfigError),
}

impl ApiError {
    /// Whether the server reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpResponse { status: 404, .. })
    }
}

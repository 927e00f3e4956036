//! Error types for search and answers.

use quire_api::ApiError;
use quire_config::ConfigError;

/// Error from search or answer operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A backend call failed.
    #[error("backend request failed")]
    Api(#[from] ApiError),

    /// Site configuration is missing or invalid.
    #[error("invalid site configuration")]
    Config(#[from] ConfigError),
}

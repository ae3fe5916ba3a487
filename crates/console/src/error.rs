//! Error types for the console.

use thiserror::Error;

/// Errors surfaced by console actions and setup.
///
/// Loaders never return these; a failed load is recorded on its panel.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Error from the underlying HTTP client.
    #[error(transparent)]
    Client(#[from] aml_console_client::Error),

    /// Form input rejected before any request was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Nothing has been loaded yet for the requested operation.
    #[error("{0}")]
    NoData(String),

    /// An export could not be serialized.
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

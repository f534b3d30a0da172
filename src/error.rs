//! Error types for the render pipeline

use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a transcript
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed caller input (bad messages JSON, structurally invalid entries)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Failed to launch the browser (binary missing, resource exhaustion)
    #[error("Browser launch failed: {0}")]
    BrowserAcquisition(String),

    /// A pipeline stage failed (page setup, content load, evaluation)
    #[error("Rendering failed: {0}")]
    Render(String),

    /// A bounded wait elapsed before the page settled
    #[error("Render timed out after {0}ms")]
    Timeout(u64),

    /// Screenshot capture or encoding failure
    #[error("Screenshot capture failed: {0}")]
    Capture(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Render(err.to_string())
    }
}

//! Error types for the external collaborators.

use thiserror::Error;

/// Errors that can occur when talking to a model, encyclopedia or video service
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),

    #[error("Failed to run search command: {0}")]
    Command(#[from] std::io::Error),

    #[error("Search command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Turns a non-success HTTP response into `ProviderError::Api`.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

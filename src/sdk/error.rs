use thiserror::Error;

/// Errors returned by [`CaasClient`](super::CaasClient).
#[derive(Error, Debug)]
pub enum SdkError {
    /// The endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure talking to the service
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body could not be decoded
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// The service rejected the request (400)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The service reported 404 for the endpoint itself
    #[error("Endpoint not found: {0}")]
    NotFound(String),

    /// The service failed internally (500)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other status code
    #[error("Unexpected response status {status}: {reason}")]
    UnexpectedStatus { status: u16, reason: String },
}

impl SdkError {
    /// Map a non-success status and its body onto an error.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let reason = serde_json::from_str::<crate::adapters::http::ErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());

        match status.as_u16() {
            400 => Self::Rejected(reason),
            404 => Self::NotFound(reason),
            500 => Self::ServerError(reason),
            status => Self::UnexpectedStatus { status, reason },
        }
    }
}

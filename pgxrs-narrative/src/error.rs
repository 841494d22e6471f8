use thiserror::Error;

/// Why a single generation request produced no usable text.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Text generation service is disabled")]
    Disabled,
    #[error("Text generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Text generation service answered with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Text generation service returned no choices")]
    EmptyResponse,
    #[error("Generated text rejected: {0}")]
    Rejected(String),
    #[error("Invalid narrative config: {0}")]
    InvalidConfig(String),
}

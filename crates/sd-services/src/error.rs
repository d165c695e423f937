use thiserror::Error;

/// Why a service call failed. Callers log these and fall back to a
/// placeholder result.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no API key configured for {0}")]
    MissingKey(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("invalid request URL: {0}")]
    Url(String),

    #[error("response contained no text")]
    EmptyResponse,
}

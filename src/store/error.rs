use thiserror::Error;

/// Failure of a single call against the contacts API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or its response could not be read
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response resolved with a status other than the documented one
    #[error("unexpected status {actual} (expected {expected})")]
    UnexpectedStatus { expected: u16, actual: u16 },
    /// The response body was not a valid contact payload
    #[error("could not decode response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

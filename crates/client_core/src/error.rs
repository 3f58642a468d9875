use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected before any request was issued.
    #[error("{0}")]
    Validation(String),
    /// The request never reached a response (connect, DNS, timeout).
    #[error("network error: {cause}")]
    Network { cause: String },
    #[error("request failed with status code {status}")]
    Http { status: u16, body: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Auth { message: String },
    #[error("unexpected payload: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network {
            cause: cause.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Network { .. } => ErrorCode::Network,
            Self::Http { .. } => ErrorCode::Http,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Auth { .. } => ErrorCode::Auth,
            Self::Decode(_) => ErrorCode::Decode,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<&ClientError> for ApiError {
    fn from(value: &ClientError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(value: ClientError) -> Self {
        ApiError::from(&value)
    }
}

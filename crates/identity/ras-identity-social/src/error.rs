//! Social login error types.

use crate::response::AuthStatus;
use thiserror::Error;

pub type SocialResult<T> = Result<T, SocialError>;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Illegal redirect uri: {0}")]
    IllegalRedirectUri(String),

    #[error("Illegal authorization code")]
    IllegalCode,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("{message}")]
    ProviderError {
        code: Option<String>,
        message: String,
    },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl SocialError {
    /// Status reported in a response envelope for this failure.
    pub fn status(&self) -> AuthStatus {
        match self {
            SocialError::ConfigError(_) => AuthStatus::ParameterIncomplete,
            SocialError::IllegalRedirectUri(_) => AuthStatus::IllegalRedirectUri,
            SocialError::IllegalCode => AuthStatus::IllegalCode,
            SocialError::Unsupported(_) => AuthStatus::Unsupported,
            SocialError::NotImplemented(_) => AuthStatus::NotImplemented,
            _ => AuthStatus::Failure,
        }
    }

    /// True for failures detected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SocialError::ConfigError(_)
                | SocialError::IllegalRedirectUri(_)
                | SocialError::IllegalCode
                | SocialError::Unsupported(_)
                | SocialError::NotImplemented(_)
        )
    }
}

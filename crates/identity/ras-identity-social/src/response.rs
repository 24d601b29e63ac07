//! Response envelope returned by the provider contract.

use crate::error::SocialResult;
use serde::{Deserialize, Serialize};

/// Outcome taxonomy reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Success,
    Failure,
    NotImplemented,
    ParameterIncomplete,
    Unsupported,
    IllegalRedirectUri,
    IllegalCode,
}

impl AuthStatus {
    pub fn code(self) -> u16 {
        match self {
            AuthStatus::Success => 2000,
            AuthStatus::Failure => 5000,
            AuthStatus::NotImplemented => 5001,
            AuthStatus::ParameterIncomplete => 5002,
            AuthStatus::Unsupported => 5003,
            AuthStatus::IllegalRedirectUri => 5006,
            AuthStatus::IllegalCode => 5008,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AuthStatus::Success => "Success",
            AuthStatus::Failure => "Failure",
            AuthStatus::NotImplemented => "Not Implemented",
            AuthStatus::ParameterIncomplete => "Parameter incomplete",
            AuthStatus::Unsupported => "Unsupported operation",
            AuthStatus::IllegalRedirectUri => "Illegal redirect uri",
            AuthStatus::IllegalCode => "Illegal code",
        }
    }
}

/// Envelope carrying either a payload or a failure status and message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse<T> {
    pub status: AuthStatus,
    #[serde(rename = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> AuthResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: AuthStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(status: AuthStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Failure with the status' default message.
    pub fn from_status(status: AuthStatus) -> Self {
        Self::failure(status, status.message())
    }

    /// Folds an operation result into an envelope; provider errors keep
    /// the provider's own message.
    pub fn from_result(result: SocialResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err.status(), err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AuthStatus::Success
    }

    pub fn code(&self) -> u16 {
        self.status.code()
    }
}

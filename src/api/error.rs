//! Failure classification for endpoint calls

use thiserror::Error;

use super::Action;

/// Coarse error taxonomy that drives retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was aborted by the configured timeout
    Timeout,
    /// Connectivity problems and 5xx responses
    Transient,
    /// HTTP 429
    RateLimited,
    /// The endpoint answered but refused the request
    Rejected,
    /// Anything else
    Unknown,
}

/// A failed call to the remote endpoint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure: no HTTP response was received
    #[error("connection failed: {0}")]
    Connect(String),

    /// HTTP 0 or 404, which the endpoint's host returns when unreachable
    #[error("endpoint unreachable (HTTP {status})")]
    Unreachable { status: u16 },

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("rate limited")]
    RateLimited,

    #[error("session rejected by server")]
    Unauthorized,

    #[error("HTTP {status}")]
    Http { status: u16, message: Option<String> },

    /// 2xx with `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::Connect(_) | ApiError::Unreachable { .. } | ApiError::Server { .. } => {
                ErrorKind::Transient
            }
            ApiError::RateLimited => ErrorKind::RateLimited,
            ApiError::Unauthorized | ApiError::Rejected(_) => ErrorKind::Rejected,
            ApiError::Http { .. } | ApiError::Malformed(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Short message suitable for showing to the person at the keyboard
    pub fn user_message(&self, action: Action) -> String {
        let label = action.label();
        match self {
            ApiError::Timeout => format!("{} request timed out. Please try again.", label),
            ApiError::Connect(_) | ApiError::Unreachable { .. } => {
                "Unable to connect to server. Please check your internet connection.".to_string()
            }
            ApiError::Server { status } => {
                format!("Server error ({}). Please try again later.", status)
            }
            ApiError::RateLimited => {
                "Too many requests. Please wait a moment before trying again.".to_string()
            }
            ApiError::Unauthorized if action == Action::Login => "Invalid credentials".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::Http {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ApiError::Http { status, .. } => {
                format!("{} failed ({}). Please try again later.", label, status)
            }
            ApiError::Rejected(message) => message.clone(),
            ApiError::Malformed(_) => format!("{} failed. Please try again.", label),
        }
    }
}

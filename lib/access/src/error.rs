//! Error types for the access crate.
//!
//! Errors from the auth endpoints never reach views. The session store
//! classifies them into "no session" during restoration and into a
//! reported message for login and registration.

use std::fmt;

/// Errors from calls to the authentication endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthApiError {
    /// Credentials were rejected, or the bearer token is invalid or expired.
    Unauthorized { message: Option<String> },
    /// The server answered with a non-success status.
    Rejected { status: u16, message: Option<String> },
    /// The request never produced a response.
    Transport { details: String },
    /// The response body could not be decoded.
    Decode { details: String },
    /// The client was misconfigured.
    InvalidConfig { details: String },
}

impl AuthApiError {
    /// Returns the human-readable message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Rejected { message, .. } => message.as_deref(),
            Self::Transport { .. } | Self::Decode { .. } | Self::InvalidConfig { .. } => None,
        }
    }

    /// Returns true if the server rejected the credentials or token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl fmt::Display for AuthApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized { message } => match message {
                Some(message) => write!(f, "unauthorized: {message}"),
                None => write!(f, "unauthorized"),
            },
            Self::Rejected { status, message } => match message {
                Some(message) => write!(f, "request rejected with status {status}: {message}"),
                None => write!(f, "request rejected with status {status}"),
            },
            Self::Transport { details } => {
                write!(f, "auth request failed: {details}")
            }
            Self::Decode { details } => {
                write!(f, "invalid auth response: {details}")
            }
            Self::InvalidConfig { details } => {
                write!(f, "invalid auth client configuration: {details}")
            }
        }
    }
}

impl std::error::Error for AuthApiError {}

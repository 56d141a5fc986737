//! Errors surfaced by the client and the messages shown for them.

use reqwest::StatusCode;
use shared::config::ConfigError;
use thiserror::Error;

use crate::credentials::CredentialError;

/// Result of every client operation.
pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback shown when a rejected login carries no server message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
/// Fallback shown when a rejected registration carries no server message.
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// Everything a client operation can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the login credentials.
    #[error("{0}")]
    Authentication(String),

    /// The server rejected the registration (e.g. duplicate email).
    #[error("{0}")]
    Registration(String),

    /// An authenticated request was refused; the stored token is no longer valid.
    #[error("session expired or invalid; sign in again")]
    Unauthorized,

    /// Any other non-success response.
    #[error("server returned {status}: {message}")]
    Server {
        /// Response status.
        status: StatusCode,
        /// Message taken from the error body, or the status reason.
        message: String,
    },

    /// The request never produced a response, or its body could not be decoded.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The configuration could not produce a usable client.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The credential could not be persisted or cleared.
    #[error("credential storage error: {0}")]
    Storage(#[from] CredentialError),

    /// A local file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file.
        path: String,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Message suitable for direct display to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status carried by the error, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Server { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            _ => None,
        }
    }
}

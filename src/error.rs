//! Error types returned by the game API client.
//!
//! Every failure surfaces as an [`ApiError`]. Configuration and argument
//! problems are detected before any network activity; everything that goes
//! wrong on the wire is wrapped into [`ApiError::Transport`], which keeps the
//! original [`TransportFailure`] as its source.

use thiserror::Error;

/// Boxed underlying error kept as the cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`crate::ApiClient`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing base URL, missing auth token before a protected call, or a
    /// missing required argument. Never reaches the network.
    #[error("{message}")]
    Config { message: String },

    /// An argument has the wrong shape (e.g. a non finite score).
    #[error("{message}")]
    Validation { message: String },

    /// The HTTP round trip failed.
    ///
    /// `status` is set only when the server answered.
    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
        #[source]
        cause: TransportFailure,
    },
}

impl ApiError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ApiError::Config {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// Human readable message of the error.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Config { message }
            | ApiError::Validation { message }
            | ApiError::Transport { message, .. } => message,
        }
    }

    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ApiError::Config { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// Raw failure reported by a [`crate::api::Transport`].
#[derive(Error, Debug)]
pub enum TransportFailure {
    /// The server responded with a non-2xx status.
    #[error("server responded with status {status}")]
    Status { status: u16, body: Option<String> },

    /// The request was sent but no response arrived (network error, timeout).
    #[error("no response received: {0}")]
    NoResponse(#[source] BoxError),

    /// The request could not be constructed or sent.
    #[error("{0}")]
    Send(#[source] BoxError),
}

impl From<reqwest::Error> for TransportFailure {
    /// Builder errors never left the process; everything else happened
    /// after the request was dispatched.
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            TransportFailure::Send(Box::new(error))
        } else {
            TransportFailure::NoResponse(Box::new(error))
        }
    }
}

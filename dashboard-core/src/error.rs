//! Error types for the aggregation layer.
//!
//! [`TransportError`] and [`DecodeError`] are produced by the client and the
//! decoder. [`ServiceError`] is the public taxonomy; only the facade builds it.

use crate::client::Endpoint;

/// The upstream could not be reached (connect failure, timeout, broken body).
#[derive(Debug, thiserror::Error)]
#[error("request to {endpoint} failed")]
pub struct TransportError {
    pub endpoint: Endpoint,
    #[source]
    pub source: reqwest::Error,
}

/// A 2xx body that doesn't match the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid payload: {0}")]
    Invalid(&'static str),
}

/// Response category handed to whatever serves the result to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadRequest,
    NotFound,
    BadGateway,
}

impl ErrorCategory {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorCategory::BadRequest => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::BadGateway => 502,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("city name is required")]
    InvalidArgument,
    #[error("city '{city}' not found")]
    NotFound { city: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{endpoint} returned an unexpected payload")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: DecodeError,
    },
    #[error("{endpoint} returned status {status}")]
    Upstream { endpoint: Endpoint, status: u16 },
}

impl ServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::InvalidArgument => ErrorCategory::BadRequest,
            ServiceError::NotFound { .. } => ErrorCategory::NotFound,
            ServiceError::Transport(_)
            | ServiceError::Decode { .. }
            | ServiceError::Upstream { .. } => ErrorCategory::BadGateway,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.category().status_code()
    }

    /// Message safe to show to an end user. Server-side failures never
    /// include upstream or library error text.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::InvalidArgument => "City name is required".to_string(),
            ServiceError::NotFound { city } => format!("City '{city}' not found"),
            ServiceError::Transport(_) => {
                "The weather provider could not be reached".to_string()
            }
            ServiceError::Decode { .. } | ServiceError::Upstream { .. } => {
                "The weather provider returned an invalid response".to_string()
            }
        }
    }
}

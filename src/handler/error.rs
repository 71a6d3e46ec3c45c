//! Handler error types.

use thiserror::Error;

/// Why a request was not mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing required header `{name}`")]
    MissingHeader { name: String },
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing required header `{name}`")]
    MissingHeader { name: String },

    #[error("invalid header name `{0}`")]
    InvalidHeaderName(String),

    #[error("unknown missing-header policy `{0}` (expected `reject` or `forward`)")]
    UnknownPolicy(String),

    #[error("malformed event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<Rejection> for HandlerError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::MissingHeader { name } => HandlerError::MissingHeader { name },
        }
    }
}

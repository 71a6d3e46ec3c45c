//! JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::handler::Rejection;

/// Body returned for refused or unreadable invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable kind: `missing_header` or `malformed_event`.
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    pub message: String,
}

impl ErrorBody {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            error: "malformed_event".to_string(),
            header: None,
            message: message.into(),
        }
    }
}

impl From<&Rejection> for ErrorBody {
    fn from(rejection: &Rejection) -> Self {
        match rejection {
            Rejection::MissingHeader { name } => Self {
                error: "missing_header".to_string(),
                header: Some(name.clone()),
                message: rejection.to_string(),
            },
        }
    }
}

pub fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

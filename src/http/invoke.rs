//! Edge invocation endpoint.
//!
//! `POST /invoke` takes an event exactly as the edge platform would deliver it
//! and answers with the request record the platform should forward.
//!
//! | Result                 | Status | Body        |
//! |------------------------|--------|-------------|
//! | forwarded              | 200    | Request     |
//! | source header missing  | 422    | `ErrorBody` |
//! | not a valid event      | 400    | `ErrorBody` |

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::event::Event;
use crate::handler::Outcome;
use crate::http::response::{error_response, ErrorBody};
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn invoke_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let start = Instant::now();

    let event: Event = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed invocation event");
            metrics::record_malformed();
            return error_response(StatusCode::BAD_REQUEST, ErrorBody::malformed(e.to_string()));
        }
    };

    let mirror = state.mirror.load_full();
    let outcome = mirror.apply(event);
    metrics::record_invoke_duration(start);

    match outcome {
        Outcome::Forwarded(request) => {
            // Forwarded without a source header means the forward policy let it through
            if request.headers.contains(mirror.source().as_str()) {
                metrics::record_outcome(metrics::OUTCOME_FORWARDED);
            } else {
                metrics::record_outcome(metrics::OUTCOME_PASSTHROUGH);
            }
            (StatusCode::OK, Json(request)).into_response()
        }
        Outcome::Rejected(rejection) => {
            metrics::record_outcome(metrics::OUTCOME_REJECTED);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, ErrorBody::from(&rejection))
        }
    }
}

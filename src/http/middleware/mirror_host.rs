//! Live-traffic header mirror.
//! Applies the active mirror rule to real HTTP requests before the inner handler.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::handler::OnMissing;
use crate::http::request::request_id;
use crate::http::response::{error_response, ErrorBody};
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn mirror_host_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let mirror = state.mirror.load_full();
    let uri = request.uri().clone();

    match mirror.mirror_http(request.headers_mut(), &uri) {
        Ok(()) => {
            metrics::record_outcome(metrics::OUTCOME_FORWARDED);
            next.run(request).await
        }
        Err(_) if mirror.on_missing() == OnMissing::Forward => {
            metrics::record_outcome(metrics::OUTCOME_PASSTHROUGH);
            next.run(request).await
        }
        Err(rejection) => {
            tracing::warn!(
                request_id = %request_id(&request),
                path = %uri.path(),
                "Rejecting request: {}",
                rejection
            );
            metrics::record_outcome(metrics::OUTCOME_REJECTED);
            error_response(StatusCode::BAD_REQUEST, ErrorBody::from(&rejection))
        }
    }
}

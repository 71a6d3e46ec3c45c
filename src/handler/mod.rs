//! Header-mirror handler.
//!
//! # Data Flow
//! ```text
//! Event
//!     → mirror.rs (look up source header, write target header)
//!     → Outcome::Forwarded(Request)   source present, or policy = forward
//!     → Outcome::Rejected(Rejection)  source missing and policy = reject
//! ```
//!
//! # Design Decisions
//! - Pure: no I/O, no shared state, one invocation per call
//! - Only the target header is written; other names keep their spelling and order
//! - A missing source header is an explicit branch, never a panic

pub mod error;
pub mod mirror;

pub use error::{HandlerError, Rejection};
pub use mirror::{HeaderMirror, OnMissing, Outcome, HOST, X_HOST};

use crate::event::{Event, Request};

/// Copy `host` into `x-host` on the event's request and return the request.
///
/// Fails with [`HandlerError::MissingHeader`] when the request has no `host`.
pub fn handle(event: Event) -> Result<Request, HandlerError> {
    HeaderMirror::default().handle(event)
}

/// [`handle`] over raw JSON: event bytes in, request bytes out.
pub fn handle_json(body: &[u8]) -> Result<Vec<u8>, HandlerError> {
    let event: Event = serde_json::from_slice(body).map_err(HandlerError::MalformedEvent)?;
    let request = handle(event)?;
    serde_json::to_vec(&request).map_err(HandlerError::Encode)
}

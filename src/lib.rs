//! Edge request interceptor that mirrors the `Host` header into `x-host`.

pub mod config;
pub mod event;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::MirrorConfig;
pub use event::{Event, HeaderEntry, Headers, Request};
pub use handler::{handle, handle_json, HandlerError, HeaderMirror, OnMissing, Outcome, Rejection};
pub use http::HttpServer;
pub use lifecycle::Shutdown;

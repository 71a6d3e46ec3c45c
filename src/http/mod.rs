//! HTTP invocation runtime.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout, concurrency limit)
//!     → POST /invoke   → invoke.rs (event JSON → handler → request JSON)
//!     → GET  /health, /config, /metrics
//!     → anything else  → middleware/mirror_host.rs → echo of mirrored headers
//! ```

pub mod invoke;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::{AppState, HttpServer};

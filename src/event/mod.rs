//! Edge request event model.
//!
//! # Wire Shape
//! ```text
//! {
//!   "version": "1.0",
//!   "context": { ... },
//!   "viewer": { "ip": "..." },
//!   "request": {
//!     "method": "GET",
//!     "uri": "/index.html",
//!     "querystring": { ... },
//!     "headers": {
//!       "host": { "value": "example.com" },
//!       "accept": { "value": "text/html", "multiValue": [{ "value": "text/html" }] }
//!     },
//!     "cookies": { ... }
//!   }
//! }
//! ```
//!
//! # Design Decisions
//! - Header names are lowercased on the way in; lookups are case-insensitive
//! - Fields the platform sends that we do not model are kept verbatim
//! - `querystring`, `cookies`, `context` and `viewer` stay opaque JSON

pub mod headers;
pub mod request;

pub use headers::{HeaderEntry, Headers, MultiValue};
pub use request::{Event, Request};

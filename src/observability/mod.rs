//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler + http produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

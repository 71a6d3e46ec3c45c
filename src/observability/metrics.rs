//! Metrics collection and exposition.
//!
//! # Metrics
//! - `host_mirror_invocations_total{outcome}` (counter): forwarded / rejected / passthrough
//! - `host_mirror_malformed_events_total` (counter): invoke bodies that failed to parse
//! - `host_mirror_invoke_duration_seconds` (histogram): `/invoke` handling time
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const OUTCOME_FORWARDED: &str = "forwarded";
pub const OUTCOME_REJECTED: &str = "rejected";
pub const OUTCOME_PASSTHROUGH: &str = "passthrough";

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "host_mirror_invocations_total",
        "Handler invocations by outcome"
    );
    describe_counter!(
        "host_mirror_malformed_events_total",
        "Invocation bodies that were not a valid event"
    );
    describe_histogram!(
        "host_mirror_invoke_duration_seconds",
        "Time spent handling one invocation"
    );

    Ok(handle)
}

pub fn record_outcome(outcome: &'static str) {
    counter!("host_mirror_invocations_total", "outcome" => outcome).increment(1);
}

pub fn record_malformed() {
    counter!("host_mirror_malformed_events_total").increment(1);
}

pub fn record_invoke_duration(start: Instant) {
    histogram!("host_mirror_invoke_duration_seconds").record(start.elapsed().as_secs_f64());
}

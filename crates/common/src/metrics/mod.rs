//! Metrics and observability utilities
//!
//! Provides Prometheus metric descriptions, histogram buckets and
//! recording helpers with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all scripture-chat metrics
pub const METRICS_PREFIX: &str = "scripture_chat";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Buckets for full answer streams, which run for as long as the model writes
pub const STREAM_BUCKETS: &[f64] = &[
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    20.00,  // 20s
    40.00,  // 40s
    60.00,  // 1m
    120.0,  // 2m
];

/// How a relayed answer stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Upstream closed the body normally
    Completed,
    /// Caller went away before the upstream finished
    Abandoned,
    /// Upstream body failed mid-stream
    Failed,
}

impl StreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamOutcome::Completed => "completed",
            StreamOutcome::Abandoned => "abandoned",
            StreamOutcome::Failed => "failed",
        }
    }
}

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Time to response headers in seconds"
    );

    // Relay metrics
    describe_counter!(
        format!("{}_questions_total", METRICS_PREFIX),
        Unit::Count,
        "Questions forwarded to the knowledge service"
    );

    describe_gauge!(
        format!("{}_streams_active", METRICS_PREFIX),
        Unit::Count,
        "Answer streams currently being relayed"
    );

    describe_histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Time until the knowledge service responded"
    );

    describe_counter!(
        format!("{}_upstream_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Knowledge service responses that were not successful"
    );

    describe_counter!(
        format!("{}_streams_total", METRICS_PREFIX),
        Unit::Count,
        "Answer streams by outcome"
    );

    describe_histogram!(
        format!("{}_stream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Duration of relayed answer streams"
    );

    describe_counter!(
        format!("{}_relayed_bytes_total", METRICS_PREFIX),
        Unit::Bytes,
        "Answer bytes relayed to callers"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record a question accepted for forwarding
pub fn record_question(mode: &str) {
    counter!(
        format!("{}_questions_total", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Record the knowledge service's response status and latency
pub fn record_upstream_response(duration_secs: f64, status: u16) {
    histogram!(format!("{}_upstream_duration_seconds", METRICS_PREFIX)).record(duration_secs);

    if !(200..300).contains(&status) {
        counter!(
            format!("{}_upstream_errors_total", METRICS_PREFIX),
            "status" => status.to_string()
        )
        .increment(1);
    }
}

/// Record a knowledge service call that never produced a response
pub fn record_upstream_failure(kind: &str) {
    counter!(
        format!("{}_upstream_errors_total", METRICS_PREFIX),
        "status" => kind.to_string()
    )
    .increment(1);
}

/// Mark an answer stream as started
pub fn record_stream_started() {
    gauge!(format!("{}_streams_active", METRICS_PREFIX)).increment(1.0);
}

/// Record how an answer stream ended
pub fn record_stream_finished(outcome: StreamOutcome, duration_secs: f64, bytes: u64) {
    gauge!(format!("{}_streams_active", METRICS_PREFIX)).decrement(1.0);

    counter!(
        format!("{}_streams_total", METRICS_PREFIX),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(
        format!("{}_stream_duration_seconds", METRICS_PREFIX),
        "outcome" => outcome.as_str()
    )
    .record(duration_secs);

    counter!(format!("{}_relayed_bytes_total", METRICS_PREFIX)).increment(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_are_sorted() {
        for buckets in [LATENCY_BUCKETS, STREAM_BUCKETS] {
            let mut prev = 0.0;
            for &bucket in buckets {
                assert!(bucket > prev);
                prev = bucket;
            }
        }
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(StreamOutcome::Completed.as_str(), "completed");
        assert_eq!(StreamOutcome::Abandoned.as_str(), "abandoned");
        assert_eq!(StreamOutcome::Failed.as_str(), "failed");
    }

    #[test]
    fn test_recording_without_recorder() {
        let metrics = RequestMetrics::start("POST", "/api/chat");
        metrics.finish(200);
        record_question("quick");
        record_upstream_response(0.02, 503);
        record_stream_started();
        record_stream_finished(StreamOutcome::Completed, 1.5, 512);
        // Just verify it runs without panic
    }
}

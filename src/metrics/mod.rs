//! Metrics module
//!
//! Prometheus metrics for PutObject traffic.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, register_histogram_vec, Counter,
    CounterVec, Encoder, Histogram, HistogramVec, TextEncoder,
};

lazy_static! {
    // Upload metrics
    pub static ref PUT_OBJECT_TOTAL: CounterVec = register_counter_vec!(
        "s3put_put_object_total",
        "Total number of PutObject requests",
        &["bucket", "status"]
    ).unwrap();

    pub static ref UPLOAD_BYTES_TOTAL: Counter = register_counter!(
        "s3put_upload_bytes_total",
        "Total bytes uploaded"
    ).unwrap();

    pub static ref PUT_OBJECT_DURATION: HistogramVec = register_histogram_vec!(
        "s3put_put_object_duration_seconds",
        "PutObject duration in seconds",
        &["bucket"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    ).unwrap();

    // Header projection metrics
    pub static ref HEADERS_EMITTED: Histogram = register_histogram!(
        "s3put_headers_emitted",
        "Number of headers projected per PutObject request",
        vec![0.0, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0]
    ).unwrap();

    // Error metrics
    pub static ref ERRORS_TOTAL: CounterVec = register_counter_vec!(
        "s3put_errors_total",
        "Total errors",
        &["type"]
    ).unwrap();
}

/// Record a successful PutObject
pub fn record_put_object_success(bucket: &str, bytes: u64) {
    PUT_OBJECT_TOTAL.with_label_values(&[bucket, "success"]).inc();
    UPLOAD_BYTES_TOTAL.inc_by(bytes as f64);
}

/// Record a failed PutObject
pub fn record_put_object_failure(bucket: &str) {
    PUT_OBJECT_TOTAL.with_label_values(&[bucket, "failure"]).inc();
}

/// Record PutObject duration
pub fn record_put_object_duration(bucket: &str, duration_secs: f64) {
    PUT_OBJECT_DURATION
        .with_label_values(&[bucket])
        .observe(duration_secs);
}

/// Record how many headers a request projected to
pub fn record_headers_emitted(count: usize) {
    HEADERS_EMITTED.observe(count as f64);
}

/// Record an error
pub fn record_error(error_type: &str) {
    ERRORS_TOTAL.with_label_values(&[error_type]).inc();
}

/// Render every registered metric in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

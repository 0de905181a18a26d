use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all jobboard metrics
const PREFIX: &str = "jobboard";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Categorization Metrics
    pub static ref CATEGORIZATION_RUNS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_categorization_runs_total"), "Categorization workflow runs by outcome"),
        &["trigger", "outcome"]
    ).expect("Failed to create categorization_runs_total metric");

    pub static ref CLASSIFIER_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_classifier_request_duration_seconds"),
            "Category classifier latency in seconds"
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["outcome"]
    ).expect("Failed to create classifier_request_duration_seconds metric");

    // Side-effect Metrics
    pub static ref NOTIFICATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_notifications_total"), "Notifications by delivery result"),
        &["delivery"]
    ).expect("Failed to create notifications_total metric");

    pub static ref EVENT_LOG_APPENDS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_event_log_appends_total"), "Event log appends by outcome"),
        &["outcome"]
    ).expect("Failed to create event_log_appends_total metric");

    // Realtime Metrics
    pub static ref CONNECTED_USERS: Gauge = Gauge::new(
        format!("{PREFIX}_connected_users"),
        "Number of users announced on a realtime channel"
    ).expect("Failed to create connected_users metric");

    pub static ref OPEN_CHANNELS: Gauge = Gauge::new(
        format!("{PREFIX}_open_channels"),
        "Number of open realtime channels, announced or not"
    ).expect("Failed to create open_channels metric");

    pub static ref REALTIME_DROPPED_MESSAGES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_realtime_dropped_messages_total"), "Realtime messages dropped by reason"),
        &["reason"]
    ).expect("Failed to create realtime_dropped_messages_total metric");

    // Error Metrics
    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Total errors by type and endpoint"),
        &["error_type", "endpoint"]
    ).expect("Failed to create errors_total metric");

    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CATEGORIZATION_RUNS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CLASSIFIER_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(NOTIFICATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(EVENT_LOG_APPENDS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CONNECTED_USERS.clone()));
    let _ = REGISTRY.register(Box::new(OPEN_CHANNELS.clone()));
    let _ = REGISTRY.register(Box::new(REALTIME_DROPPED_MESSAGES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record the end of a categorization run
pub fn record_categorization_run(trigger: &str, outcome: &str) {
    CATEGORIZATION_RUNS_TOTAL
        .with_label_values(&[trigger, outcome])
        .inc();
}

/// Record a classifier round trip
pub fn record_classifier_request(outcome: &str, duration: Duration) {
    CLASSIFIER_REQUEST_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(duration.as_secs_f64());
}

/// Record a notification: `delivered`, `stored` or `failed`
pub fn record_notification(delivery: &str) {
    NOTIFICATIONS_TOTAL.with_label_values(&[delivery]).inc();
}

/// Record an event log append
pub fn record_event_log_append(outcome: &str) {
    EVENT_LOG_APPENDS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Update realtime connection gauges
pub fn set_realtime_connections(users: usize, channels: usize) {
    CONNECTED_USERS.set(users as f64);
    OPEN_CHANNELS.set(channels as f64);
}

/// Record a realtime message that never reached its queue: `full` or `closed`
pub fn record_realtime_drop(reason: &str) {
    REALTIME_DROPPED_MESSAGES_TOTAL
        .with_label_values(&[reason])
        .inc();
}

/// Record an error
pub fn record_error(error_type: &str, endpoint: &str) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, endpoint])
        .inc();
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // RSS is reported in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

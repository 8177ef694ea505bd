//! Prometheus metrics for the nichepulse dashboard
//!
//! This module provides metrics tracking for:
//! - HTTP API: request counts and latency per route
//! - Analysis: refresh outcomes and AI call latency
//! - Store: record counts per collection
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

use crate::store::StoreStats;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all dashboard metrics
struct DashboardMetrics {
    api_requests: CounterVec,
    api_duration: HistogramVec,
    analysis_runs: CounterVec,
    llm_duration: HistogramVec,
    store_records: GaugeVec,
}

/// Global storage for dashboard metrics; `None` when registration failed
static METRICS: OnceLock<Option<DashboardMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static DashboardMetrics> {
    METRICS.get().and_then(Option::as_ref)
}

// ============================================================================
// Initialization
// ============================================================================

fn register_metrics() -> prometheus::Result<DashboardMetrics> {
    Ok(DashboardMetrics {
        api_requests: register_counter_vec!(
            "nichepulse_api_requests_total",
            "Total API requests by endpoint and status",
            &["endpoint", "status"]
        )?,
        api_duration: register_histogram_vec!(
            "nichepulse_api_request_duration_seconds",
            "API request duration in seconds",
            &["endpoint"],
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
        )?,
        analysis_runs: register_counter_vec!(
            "nichepulse_analysis_runs_total",
            "Analysis refreshes by outcome",
            &["outcome"]
        )?,
        llm_duration: register_histogram_vec!(
            "nichepulse_llm_request_duration_seconds",
            "Chat completion round trip in seconds",
            &["operation"],
            vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
        )?,
        store_records: register_gauge_vec!(
            "nichepulse_store_records",
            "Records held per collection",
            &["collection"]
        )?,
    })
}

/// Initialize all Prometheus metrics
///
/// Safe to call more than once or from several threads; only the first call
/// registers anything. A failed registration is reported once and leaves
/// every recorder a no-op.
///
/// ```ignore
/// if let Err(e) = nichepulse::metrics::init_metrics() {
///     tracing::warn!("Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let mut failure = None;
    METRICS.get_or_init(|| match register_metrics() {
        Ok(metrics) => {
            tracing::info!("Prometheus metrics initialized successfully");
            Some(metrics)
        }
        Err(e) => {
            failure = Some(e);
            None
        }
    });

    match failure {
        Some(e) => Err(Box::new(e)),
        None => Ok(()),
    }
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    metrics().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record API request
pub fn record_api_request(endpoint: &str, status: u16, duration_secs: f64) {
    let Some(m) = metrics() else {
        return;
    };

    let status_str = status.to_string();
    m.api_requests
        .with_label_values(&[endpoint, &status_str])
        .inc();
    m.api_duration
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Record the outcome of one analysis refresh
pub fn record_analysis_run(outcome: &str) {
    if let Some(m) = metrics() {
        m.analysis_runs.with_label_values(&[outcome]).inc();
    }
}

/// Publish current record counts
pub fn update_store_records(stats: &StoreStats) {
    let Some(m) = metrics() else {
        return;
    };

    let counts = [
        ("niches", stats.niches),
        ("niche_insights", stats.niche_insights),
        ("monetization_insights", stats.monetization_insights),
        ("recommendations", stats.recommendations),
        ("metrics", stats.metrics),
        ("trending", stats.trending),
    ];
    for (collection, count) in counts {
        m.store_records
            .with_label_values(&[collection])
            .set(count as f64);
    }
}

/// Histogram timer guard that records duration on drop
pub struct MetricsTimer {
    timer: Option<prometheus::HistogramTimer>,
}

impl MetricsTimer {
    fn new(timer: prometheus::HistogramTimer) -> Self {
        Self { timer: Some(timer) }
    }

    /// Create a no-op timer when metrics are not initialized
    fn noop() -> Self {
        Self { timer: None }
    }
}

impl Drop for MetricsTimer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop_and_record();
        }
    }
}

/// Start timing one AI call
pub fn start_llm_timer(operation: &str) -> MetricsTimer {
    match metrics() {
        Some(m) => MetricsTimer::new(m.llm_duration.with_label_values(&[operation]).start_timer()),
        None => MetricsTimer::noop(),
    }
}

// ============================================================================
// Tests
// ============================================================================

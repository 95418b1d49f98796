//! Metrics facade for the transcription intake service
//!
//! Recording a metric must never fail a request: exporters are fire-and-forget
//! and log their own transport errors. The facade exposes intake-domain
//! recording helpers so handlers never deal with metric names or labels
//! directly.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::metrics::null::NullExporter;
use crate::metrics::statsd::StatsDExporter;

/// Metrics exporter trait for pluggable monitoring backends
#[async_trait]
pub trait MetricsExporter: Send + Sync {
    /// Increment a counter metric by 1
    async fn increment(&self, name: &str, labels: &[(&str, &str)]);

    /// Set a gauge metric value
    async fn set_gauge(&self, name: &str, value: f64, labels: &[(&str, &str)]);

    /// Observe a value in a histogram metric
    async fn observe_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]);
}

/// Metrics facade for the application
#[derive(Clone)]
pub struct Metrics {
    exporter: Arc<dyn MetricsExporter>,
}

impl Metrics {
    pub fn new(exporter: Arc<dyn MetricsExporter>) -> Self {
        Self { exporter }
    }

    /// Record an HTTP request with its duration
    pub async fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status: &str,
        duration_seconds: f64,
    ) {
        let labels = [("method", method), ("endpoint", endpoint), ("status", status)];
        self.exporter.increment("http_requests_total", &labels).await;
        self.exporter
            .observe_histogram(
                "http_request_duration_ms",
                duration_seconds * 1000.0,
                &[("endpoint", endpoint)],
            )
            .await;
    }

    /// Record an upload that passed validation and landed on shared storage
    pub async fn record_upload_accepted(&self, size_bytes: usize) {
        self.exporter.increment("uploads_accepted_total", &[]).await;
        self.exporter
            .observe_histogram("upload_size_bytes", size_bytes as f64, &[])
            .await;
    }

    /// Record a rejected upload with the rejection reason
    pub async fn record_upload_rejected(&self, reason: &str) {
        self.exporter
            .increment("uploads_rejected_total", &[("reason", reason)])
            .await;
    }

    /// Record a successful queue publication and the resulting queue depth
    pub async fn record_job_queued(&self, queue_depth: usize) {
        self.exporter.increment("jobs_queued_total", &[]).await;
        self.exporter
            .set_gauge("work_queue_depth", queue_depth as f64, &[])
            .await;
    }

    /// Record a failed queue publication
    pub async fn record_publish_failure(&self) {
        self.exporter
            .increment("queue_publish_failures_total", &[])
            .await;
    }

    /// Record a status lookup with its outcome
    pub async fn record_status_lookup(&self, outcome: &str) {
        self.exporter
            .increment("status_lookups_total", &[("outcome", outcome)])
            .await;
    }
}

/// Select a metrics exporter from configuration
///
/// Falls back to the null exporter on unknown backends or invalid endpoints,
/// a metrics misconfiguration must not keep the service from starting.
pub fn create_metrics_exporter(
    backend: &str,
    endpoint: Option<&str>,
    prefix: Option<&str>,
) -> Arc<dyn MetricsExporter> {
    match backend {
        "statsd" => {
            let endpoint = endpoint.unwrap_or("127.0.0.1:8125");
            match StatsDExporter::new(endpoint, prefix) {
                Ok(exporter) => Arc::new(exporter),
                Err(e) => {
                    warn!("Falling back to null metrics exporter: {}", e);
                    Arc::new(NullExporter)
                }
            }
        }
        "none" | "disabled" => Arc::new(NullExporter),
        other => {
            warn!("Unknown metrics backend '{}', metrics disabled", other);
            Arc::new(NullExporter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_backend_records_without_panicking() {
        let metrics = Metrics::new(create_metrics_exporter("none", None, None));
        metrics.record_http_request("POST", "/transcribe", "200", 0.05).await;
        metrics.record_upload_accepted(1024).await;
        metrics.record_upload_rejected("invalid_type").await;
        metrics.record_job_queued(3).await;
        metrics.record_status_lookup("not_found").await;
    }

    #[test]
    fn invalid_statsd_endpoint_falls_back_to_null() {
        // Must not panic or refuse to construct
        let _ = create_metrics_exporter("statsd", Some("not an endpoint"), None);
    }

    #[test]
    fn unknown_backend_falls_back_to_null() {
        let _ = create_metrics_exporter("graphite", None, None);
    }
}

// StatsD exporter for intake service metrics
//
// Pushes metrics over UDP in the StatsD line format:
// - Counters:   metric_name:1|c[|#tag1:value1,tag2:value2]
// - Gauges:     metric_name:value|g[|#tags]
// - Histograms: metric_name:value|h[|#tags]
//
// Sends are fire-and-forget; a lost datagram costs one data point, never a
// request.

use async_trait::async_trait;
use log::{debug, error};
use std::net::SocketAddr;
use tokio::net::UdpSocket;

use crate::metrics::metrics::MetricsExporter;

/// StatsD metrics exporter implementation
pub struct StatsDExporter {
    /// StatsD server address (host:port)
    address: SocketAddr,
    /// Optional metric prefix for all metrics
    prefix: Option<String>,
}

impl StatsDExporter {
    /// Create a new StatsD exporter
    ///
    /// # Arguments
    /// * `endpoint` - StatsD server endpoint in format "host:port"
    /// * `prefix` - Optional prefix for all metric names
    pub fn new(endpoint: &str, prefix: Option<&str>) -> Result<Self, String> {
        // The parser only takes IP addresses, resolve the common localhost case
        let normalized = if endpoint.starts_with("localhost:") {
            endpoint.replace("localhost:", "127.0.0.1:")
        } else {
            endpoint.to_string()
        };

        let address = normalized
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid StatsD endpoint '{}': {}", endpoint, e))?;

        Ok(Self {
            address,
            prefix: prefix.map(|p| p.to_string()),
        })
    }

    /// Format metric name with optional prefix
    fn qualified(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_string(),
        }
    }

    /// Format labels as StatsD tags: |#tag1:value1,tag2:value2
    fn tags(labels: &[(&str, &str)]) -> String {
        if labels.is_empty() {
            String::new()
        } else {
            let rendered: Vec<String> = labels
                .iter()
                .map(|(key, value)| format!("{}:{}", key, value))
                .collect();
            format!("|#{}", rendered.join(","))
        }
    }

    /// Send a StatsD message via UDP
    async fn send(&self, message: String) {
        match UdpSocket::bind("0.0.0.0:0").await {
            Ok(socket) => {
                if let Err(e) = socket.send_to(message.as_bytes(), &self.address).await {
                    error!("Failed to send StatsD metric: {}", e);
                } else {
                    debug!("Sent StatsD metric: {}", message);
                }
            }
            Err(e) => {
                error!("Failed to create UDP socket for StatsD: {}", e);
            }
        }
    }
}

#[async_trait]
impl MetricsExporter for StatsDExporter {
    async fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        self.send(format!("{}:1|c{}", self.qualified(name), Self::tags(labels)))
            .await;
    }

    async fn set_gauge(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.send(format!(
            "{}:{}|g{}",
            self.qualified(name),
            value,
            Self::tags(labels)
        ))
        .await;
    }

    async fn observe_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.send(format!(
            "{}:{}|h{}",
            self.qualified(name),
            value,
            Self::tags(labels)
        ))
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_endpoint() {
        assert!(StatsDExporter::new("no-port", None).is_err());
    }

    #[test]
    fn resolves_localhost_endpoint() {
        assert!(StatsDExporter::new("localhost:8125", None).is_ok());
    }

    #[test]
    fn prefix_is_applied_to_metric_names() {
        let exporter = StatsDExporter::new("127.0.0.1:8125", Some("intake")).unwrap();
        assert_eq!(exporter.qualified("jobs_queued_total"), "intake.jobs_queued_total");

        let bare = StatsDExporter::new("127.0.0.1:8125", None).unwrap();
        assert_eq!(bare.qualified("jobs_queued_total"), "jobs_queued_total");
    }

    #[test]
    fn labels_render_as_tags() {
        assert_eq!(StatsDExporter::tags(&[]), "");
        assert_eq!(
            StatsDExporter::tags(&[("method", "POST"), ("status", "200")]),
            "|#method:POST,status:200"
        );
    }
}

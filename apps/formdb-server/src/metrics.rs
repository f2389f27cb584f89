//! Prometheus metrics implementation.
//!
//! Implements the formdb-gateway `GatewayMetrics` trait using
//! prometheus-client.

use formdb_gateway::{GatewayMetrics, StatusKind};
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use std::sync::{Arc, Mutex};

/// Prometheus metrics collector for the gateway.
pub struct PrometheusMetrics {
    registry: Arc<Mutex<Registry>>,
    requests: Family<Vec<(String, String)>, Counter>,
}

impl PrometheusMetrics {
    /// Create a new collector with a fresh registry.
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let requests = Family::<Vec<(String, String)>, Counter>::default();
        registry.register(
            "formdb_gateway_requests",
            "Requests handled by the protocol gateway",
            requests.clone(),
        );
        Self {
            registry: Arc::new(Mutex::new(registry)),
            requests,
        }
    }
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayMetrics for PrometheusMetrics {
    fn record_request(&self, protocol: &'static str, operation: &str, status: StatusKind) {
        let labels = vec![
            ("protocol".to_string(), protocol.to_string()),
            ("operation".to_string(), operation.to_string()),
            ("status".to_string(), status.as_str().to_string()),
        ];
        self.requests.get_or_create(&labels).inc();
    }

    fn render_prometheus_text(&self) -> String {
        let registry = self.registry.lock().unwrap();
        let mut buffer = String::new();
        encode(&mut buffer, &registry).unwrap();
        buffer
    }
}

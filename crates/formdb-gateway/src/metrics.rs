//! Vendor-neutral metrics ABI for the gateway.
//!
//! The gateway depends only on this trait; the Prometheus backend lives in
//! the server application.

use crate::status::StatusKind;

/// Metrics sink plus the text exposition consumed by the `/metrics` surface.
pub trait GatewayMetrics: Send + Sync {
    /// Record one handled request. `protocol` is `"rest"` or `"grpc"`;
    /// `operation` is the RPC method name or `"none"` for routing failures.
    fn record_request(&self, protocol: &'static str, operation: &str, status: StatusKind);

    /// Prometheus text exposition, returned verbatim by the Metrics
    /// operation.
    fn render_prometheus_text(&self) -> String;
}

/// A do-nothing sink for tests and embedders that don't care about
/// telemetry.
#[derive(Clone, Copy, Default)]
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_request(&self, _protocol: &'static str, _operation: &str, _status: StatusKind) {}

    fn render_prometheus_text(&self) -> String {
        String::new()
    }
}

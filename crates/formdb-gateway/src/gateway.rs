//! Protocol gateway and server lifecycle.
//!
//! [`Gateway`] is the top-level entry point: it classifies each inbound
//! request by path prefix and delegates to the REST router or the gRPC
//! dispatcher. Classification is total and reads nothing but the path.
//!
//! [`GatewayServer`] hosts a gateway on one listener and manages the server
//! lifecycle.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::auth::AuthValidator;
use crate::bridge::Bridge;
use crate::frame::DEFAULT_MAX_MESSAGE_SIZE;
use crate::metrics::{GatewayMetrics, NoopMetrics};
use crate::{grpc, rest};

/// Gateway configuration.
///
/// All of it is fixed at startup; the dispatch path holds no mutable state.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// REST version prefix stripped before routing.
    pub version_prefix: String,

    /// Path prefix that classifies a request as gRPC.
    pub grpc_prefix: String,

    /// Fully-qualified service name the gRPC dispatcher recognizes.
    pub grpc_service: String,

    /// Request body cap, enforced before parsing.
    pub max_body_bytes: usize,

    /// gRPC message payload cap, enforced against the declared frame length.
    pub max_message_bytes: usize,

    /// Whether the REST auth gate is enforced.
    pub auth_required: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version_prefix: "/v1".to_string(),
            grpc_prefix: "/grpc".to_string(),
            grpc_service: "formdb.v1.FormDB".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
            max_message_bytes: DEFAULT_MAX_MESSAGE_SIZE,
            auth_required: false,
        }
    }
}

/// Dual-protocol request dispatcher.
pub struct Gateway {
    pub(crate) config: GatewayConfig,
    pub(crate) bridge: Arc<dyn Bridge>,
    pub(crate) auth: Option<Arc<dyn AuthValidator>>,
    pub(crate) metrics: Arc<dyn GatewayMetrics>,
}

impl Gateway {
    /// Create a gateway over a backend bridge.
    pub fn new(config: GatewayConfig, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            config,
            bridge,
            auth: None,
            metrics: Arc::new(NoopMetrics),
        }
    }

    /// Set the auth validator consulted by the REST gate.
    pub fn with_auth(mut self, auth: Arc<dyn AuthValidator>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the metrics sink and `/metrics` exporter.
    pub fn with_metrics(mut self, metrics: Arc<dyn GatewayMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Handle one request: classify by path prefix and delegate.
    pub async fn handle(&self, req: Request<Body>) -> Response {
        if self.is_grpc_path(req.uri().path()) {
            grpc::dispatch(self, req).await
        } else {
            rest::route(self, req).await
        }
    }

    fn is_grpc_path(&self, path: &str) -> bool {
        path.strip_prefix(&self.config.grpc_prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Build the axum router. One catch-all handler feeds every request
    /// through [`Gateway::handle`], so the dispatcher owns all routing.
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(Arc::new(self))
    }
}

async fn dispatch_handler(State(gateway): State<Arc<Gateway>>, req: Request<Body>) -> Response {
    gateway.handle(req).await
}

/// Server wrapper hosting a [`Gateway`] on a single listener.
///
/// Spawns a background task for the accept loop and supports graceful
/// shutdown.
pub struct GatewayServer {
    addr: SocketAddr,
    router: Option<Router>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    server_handle: Option<JoinHandle<Result<(), std::io::Error>>>,
}

impl GatewayServer {
    /// Create a new server for the given gateway.
    pub fn new(addr: SocketAddr, gateway: Gateway) -> Self {
        Self {
            addr,
            router: Some(gateway.into_router()),
            shutdown_tx: None,
            server_handle: None,
        }
    }

    /// Start the server.
    ///
    /// Binds the listener, spawns the serve task, and returns immediately.
    pub async fn start(&mut self) -> Result<(), GatewayServerError> {
        let Some(router) = self.router.take() else {
            return Err(GatewayServerError::Startup("server already started".to_string()));
        };

        tracing::info!(address = %self.addr, "starting gateway server");

        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayServerError::Startup(format!("failed to bind: {e}")))?;
        // Record the actual address so callers binding port 0 can find us.
        self.addr = listener
            .local_addr()
            .map_err(|e| GatewayServerError::Startup(format!("failed to read local addr: {e}")))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
        });
        self.server_handle = Some(server_handle);

        tracing::info!(address = %self.addr, "gateway server started");
        Ok(())
    }

    /// Shut the server down gracefully.
    pub async fn shutdown(mut self) -> Result<(), GatewayServerError> {
        tracing::info!("shutting down gateway server");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .map_err(|e| GatewayServerError::Shutdown(format!("join error: {e}")))?
                .map_err(|e| GatewayServerError::Shutdown(format!("server error: {e}")))?;
        }

        tracing::info!("gateway server shutdown complete");
        Ok(())
    }

    /// The bound address (useful when binding an ephemeral port).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayServerError {
    #[error("startup error: {0}")]
    Startup(String),

    #[error("shutdown error: {0}")]
    Shutdown(String),
}

//! Dual-protocol request gateway for FormDB.
//!
//! One listener serves two surfaces: a JSON/REST API and a binary-framed
//! gRPC API. Both resolve to the same [`operation::Operation`] set and both
//! report outcomes through the same [`status::StatusKind`] taxonomy, so the
//! two protocols can never drift apart on what they expose or how failures
//! map to wire status codes.
//!
//! The query engine, schema analyzer, and migration orchestrator are
//! external collaborators behind [`bridge::Bridge`]; authentication and
//! metrics are likewise traits the embedding server provides.

pub mod auth;
pub mod bridge;
pub mod frame;
pub mod gateway;
pub mod grpc;
pub mod metrics;
pub mod operation;
pub mod rest;
pub mod routes;
pub mod status;

pub use auth::AuthValidator;
pub use bridge::{Bridge, Payload, Provenance, QueryRequest};
pub use gateway::{Gateway, GatewayConfig, GatewayServer, GatewayServerError};
pub use metrics::{GatewayMetrics, NoopMetrics};
pub use operation::Operation;
pub use status::{Failure, StatusKind};

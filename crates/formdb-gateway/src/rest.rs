//! JSON/REST surface.
//!
//! Auth gate first, then a pure route-table lookup, then body validation and
//! the bridge call. Every failure becomes a JSON error body
//! (`{"error": <kind>, "message": <string>}`) with the mapped HTTP status.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::Value;

use crate::bridge::{Payload, QueryRequest};
use crate::gateway::Gateway;
use crate::operation::Operation;
use crate::routes::{self, Resolution};
use crate::status::{Failure, StatusKind};

pub(crate) async fn route(gateway: &Gateway, req: Request<Body>) -> Response {
    // The auth gate runs before any routing work; on failure no handler is
    // invoked.
    if gateway.config.auth_required {
        let authorized = gateway
            .auth
            .as_ref()
            .map_or(false, |validator| validator.validate(req.headers()));
        if !authorized {
            tracing::warn!(path = %req.uri().path(), "rejecting unauthenticated request");
            return failure_response(
                gateway,
                "none",
                Failure::unauthenticated("invalid or missing credentials"),
            );
        }
    }

    let path = req.uri().path().to_string();
    let Some(endpoint) = strip_version_prefix(&path, &gateway.config.version_prefix) else {
        return failure_response(gateway, "none", Failure::not_found(format!("no route for {path}")));
    };

    match routes::resolve(req.method(), endpoint) {
        Resolution::Matched { op, resource } => execute(gateway, op, resource, req).await,
        Resolution::NotFound => {
            failure_response(gateway, "none", Failure::not_found(format!("no route for {path}")))
        }
        Resolution::MethodNotSupported => failure_response(
            gateway,
            "none",
            Failure::method_not_supported(format!("{} not supported for {path}", req.method())),
        ),
    }
}

/// Strip the configured version prefix; the remainder is the endpoint.
fn strip_version_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

async fn execute(
    gateway: &Gateway,
    op: Operation,
    resource: Option<String>,
    req: Request<Body>,
) -> Response {
    tracing::debug!(operation = op.rpc_method(), "dispatching REST request");

    // Metrics render through the exporter, not the bridge.
    if op == Operation::Metrics {
        let text = gateway.metrics.render_prometheus_text();
        gateway.metrics.record_request("rest", op.rpc_method(), StatusKind::Ok);
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response();
    }

    let request = match build_request(gateway, op, resource, req).await {
        Ok(value) => value,
        Err(failure) => return failure_response(gateway, op.rpc_method(), failure),
    };

    match gateway.bridge.execute(op, Payload::Json(request)).await {
        Ok(payload) => success_response(gateway, op, payload),
        Err(failure) => failure_response(gateway, op.rpc_method(), failure),
    }
}

/// Build the typed request forwarded to the bridge.
async fn build_request(
    gateway: &Gateway,
    op: Operation,
    resource: Option<String>,
    req: Request<Body>,
) -> Result<Value, Failure> {
    match op {
        Operation::GetCollection | Operation::DropCollection => {
            // The route table only matches these with a non-empty resource;
            // a missing one is a dispatcher bug, never an empty name.
            match resource {
                Some(name) => Ok(serde_json::json!({ "collection": name })),
                None => Err(Failure::internal("route resolved without a resource name")),
            }
        }
        Operation::Health | Operation::ListCollections | Operation::GetJournal => Ok(Value::Null),
        Operation::Query => {
            let body = read_body(gateway, req).await?;
            let typed: QueryRequest = serde_json::from_slice(&body)
                .map_err(|e| Failure::invalid_argument(format!("invalid query request: {e}")))?;
            serde_json::to_value(&typed).map_err(|e| Failure::internal(e.to_string()))
        }
        Operation::CreateCollection
        | Operation::DiscoverDependencies
        | Operation::AnalyzeNormalForm
        | Operation::MigrationStart
        | Operation::MigrationShadow
        | Operation::MigrationCommit
        | Operation::MigrationAbort => {
            let body = read_body(gateway, req).await?;
            if body.is_empty() {
                Ok(Value::Null)
            } else {
                serde_json::from_slice(&body)
                    .map_err(|e| Failure::invalid_argument(format!("malformed JSON body: {e}")))
            }
        }
        // Handled by the exporter before dispatch.
        Operation::Metrics => Ok(Value::Null),
    }
}

/// Read the request body under the configured cap. Exceeding the cap fails
/// the request rather than buffering without bound.
async fn read_body(gateway: &Gateway, req: Request<Body>) -> Result<Bytes, Failure> {
    to_bytes(req.into_body(), gateway.config.max_body_bytes)
        .await
        .map_err(|e| Failure::invalid_argument(format!("failed to read request body: {e}")))
}

fn success_response(gateway: &Gateway, op: Operation, payload: Payload) -> Response {
    if op == Operation::DropCollection {
        gateway.metrics.record_request("rest", op.rpc_method(), StatusKind::Ok);
        return StatusCode::NO_CONTENT.into_response();
    }

    let value = match payload {
        Payload::Json(v) => v,
        Payload::Bytes(b) if b.is_empty() => Value::Null,
        Payload::Bytes(b) => match serde_json::from_slice(&b) {
            Ok(v) => v,
            Err(e) => {
                return failure_response(
                    gateway,
                    op.rpc_method(),
                    Failure::internal(format!("backend returned non-JSON payload: {e}")),
                )
            }
        },
    };

    gateway.metrics.record_request("rest", op.rpc_method(), StatusKind::Ok);
    let status = if op == Operation::CreateCollection {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(value)).into_response()
}

pub(crate) fn failure_response(gateway: &Gateway, operation: &str, failure: Failure) -> Response {
    gateway.metrics.record_request("rest", operation, failure.kind);
    tracing::debug!(
        operation,
        kind = failure.kind.as_str(),
        message = %failure.message,
        "REST request failed"
    );
    let body = serde_json::json!({
        "error": failure.kind.as_str(),
        "message": failure.message,
    });
    (failure.kind.http_status(), Json(body)).into_response()
}

//! gRPC surface.
//!
//! Unary-only dispatch over the shared listener: POST, `application/grpc`
//! content-type, `<prefix>/<package>.<Service>/<Method>` path, one request
//! frame in, one response frame out. Transport status is always 200; the
//! true outcome rides in `grpc-status`, with the message in `grpc-message`
//! on failure.

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::bridge::Payload;
use crate::frame;
use crate::gateway::Gateway;
use crate::operation::Operation;
use crate::status::{Failure, StatusKind};

pub(crate) async fn dispatch(gateway: &Gateway, req: Request<Body>) -> Response {
    if req.method() != Method::POST {
        return status_response(
            gateway,
            "none",
            Err(Failure::unimplemented("gRPC requests must use POST")),
        );
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/grpc") {
        return status_response(
            gateway,
            "none",
            Err(Failure::invalid_argument(format!(
                "content-type {content_type:?} is not application/grpc"
            ))),
        );
    }

    let path = req.uri().path().to_string();
    let Some((service, method)) = parse_rpc_path(&path, &gateway.config.grpc_prefix) else {
        return status_response(gateway, "none", Err(Failure::unimplemented("unknown service")));
    };
    if service != gateway.config.grpc_service {
        return status_response(
            gateway,
            "none",
            Err(Failure::unimplemented(format!("unknown service {service}"))),
        );
    }
    let Some(op) = Operation::from_rpc_method(method) else {
        return status_response(
            gateway,
            "none",
            Err(Failure::unimplemented(format!("unimplemented method {method}"))),
        );
    };

    let body = match to_bytes(req.into_body(), gateway.config.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            return status_response(
                gateway,
                op.rpc_method(),
                Err(Failure::invalid_argument(format!(
                    "failed to read request body: {e}"
                ))),
            )
        }
    };

    // Malformed frames (compressed, truncated, oversized) downgrade to
    // InvalidArgument; they never escape to the transport.
    let payload = match frame::decode_frame(&body, gateway.config.max_message_bytes) {
        Ok((payload, _rest)) => Bytes::copy_from_slice(payload),
        Err(e) => {
            return status_response(
                gateway,
                op.rpc_method(),
                Err(Failure::invalid_argument(e.to_string())),
            )
        }
    };

    tracing::debug!(
        method = op.rpc_method(),
        payload_len = payload.len(),
        "dispatching RPC"
    );

    let result = if op == Operation::Metrics {
        Ok(Payload::Bytes(Bytes::from(
            gateway.metrics.render_prometheus_text(),
        )))
    } else {
        gateway.bridge.execute(op, Payload::Bytes(payload)).await
    };

    status_response(gateway, op.rpc_method(), result)
}

/// Parse `<prefix>/<service>/<Method>`. The method must be the final
/// segment.
fn parse_rpc_path<'a>(path: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let rest = path.strip_prefix(prefix)?;
    let rest = rest.strip_prefix('/')?;
    let (service, method) = rest.split_once('/')?;
    if service.is_empty() || method.is_empty() || method.contains('/') {
        return None;
    }
    Some((service, method))
}

/// Write exactly one response: a framed payload with `grpc-status: 0`, or an
/// empty body with the mapped status and the failure message in
/// `grpc-message`.
fn status_response(gateway: &Gateway, operation: &str, result: Result<Payload, Failure>) -> Response {
    match result {
        Ok(payload) => {
            gateway.metrics.record_request("grpc", operation, StatusKind::Ok);
            let framed = frame::encode_frame(&payload.into_bytes());
            let mut response = (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/grpc")],
                framed,
            )
                .into_response();
            response.headers_mut().insert("grpc-status", HeaderValue::from(0u32));
            response
        }
        Err(failure) => {
            gateway.metrics.record_request("grpc", operation, failure.kind);
            tracing::debug!(
                operation,
                kind = failure.kind.as_str(),
                message = %failure.message,
                "RPC failed"
            );
            let mut response = (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/grpc")],
                Body::empty(),
            )
                .into_response();
            response
                .headers_mut()
                .insert("grpc-status", HeaderValue::from(failure.kind.grpc_status()));
            if !failure.message.is_empty() {
                if let Ok(value) = HeaderValue::from_str(&encode_message(&failure.message)) {
                    response.headers_mut().insert("grpc-message", value);
                }
            }
            response
        }
    }
}

/// Percent-encode a `grpc-message` value. Printable ASCII other than `%`
/// passes through; every other byte becomes `%XX`, so the message survives
/// the header round-trip losslessly.
fn encode_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for byte in message.bytes() {
        match byte {
            b' '..=b'~' if byte != b'%' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

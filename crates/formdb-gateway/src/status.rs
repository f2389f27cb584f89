//! Status taxonomy shared by both protocol surfaces.
//!
//! Every routing, framing, or backend failure is classified into a
//! [`StatusKind`] at the point of detection and translated into the matching
//! HTTP or gRPC representation by the response writer. The two mappings must
//! stay consistent for the same logical outcome, so both live here as
//! exhaustive matches with no default arm.

use axum::http::StatusCode;

/// Canonical outcome kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Ok,
    InvalidArgument,
    Unauthenticated,
    NotFound,
    MethodNotSupported,
    Unimplemented,
    Internal,
}

impl StatusKind {
    /// HTTP status for this outcome.
    ///
    /// Ok maps to 200 here; per-operation variants (201 for creation, 204 for
    /// deletion) are chosen by the REST response writer.
    pub fn http_status(self) -> StatusCode {
        match self {
            StatusKind::Ok => StatusCode::OK,
            StatusKind::InvalidArgument => StatusCode::BAD_REQUEST,
            StatusKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            StatusKind::NotFound => StatusCode::NOT_FOUND,
            StatusKind::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            StatusKind::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            StatusKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// gRPC status code for this outcome.
    ///
    /// MethodNotSupported has no gRPC-level equivalent and is reported as
    /// Unimplemented (12) at the transport.
    pub fn grpc_status(self) -> u32 {
        match self {
            StatusKind::Ok => 0,
            StatusKind::InvalidArgument => 3,
            StatusKind::Unauthenticated => 16,
            StatusKind::NotFound => 5,
            StatusKind::MethodNotSupported => 12,
            StatusKind::Unimplemented => 12,
            StatusKind::Internal => 13,
        }
    }

    /// Stable snake_case token used in REST error bodies and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Ok => "ok",
            StatusKind::InvalidArgument => "invalid_argument",
            StatusKind::Unauthenticated => "unauthenticated",
            StatusKind::NotFound => "not_found",
            StatusKind::MethodNotSupported => "method_not_supported",
            StatusKind::Unimplemented => "unimplemented",
            StatusKind::Internal => "internal",
        }
    }

    /// All kinds, for totality checks in tests.
    pub const ALL: [StatusKind; 7] = [
        StatusKind::Ok,
        StatusKind::InvalidArgument,
        StatusKind::Unauthenticated,
        StatusKind::NotFound,
        StatusKind::MethodNotSupported,
        StatusKind::Unimplemented,
        StatusKind::Internal,
    ];
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure carrying the human-readable message that the
/// response writer surfaces (`message` field in REST, `grpc-message` header
/// in gRPC).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    pub kind: StatusKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusKind::InvalidArgument, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Unauthenticated, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusKind::NotFound, message)
    }

    pub fn method_not_supported(message: impl Into<String>) -> Self {
        Self::new(StatusKind::MethodNotSupported, message)
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Unimplemented, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Internal, message)
    }
}

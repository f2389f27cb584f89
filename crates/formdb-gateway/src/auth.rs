//! Authentication validator seam.

use axum::http::HeaderMap;

/// External credential validator consulted by the REST router before any
/// routing work when the deployment requires authentication.
pub trait AuthValidator: Send + Sync {
    /// Returns whether the request headers carry valid credentials.
    fn validate(&self, headers: &HeaderMap) -> bool;
}

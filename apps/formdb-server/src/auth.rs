//! Static bearer-token authentication.

use axum::http::{header, HeaderMap};
use formdb_gateway::AuthValidator;

/// Validator that accepts a single configured bearer token.
pub struct BearerTokenValidator {
    token: String,
}

impl BearerTokenValidator {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl AuthValidator for BearerTokenValidator {
    fn validate(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token == self.token)
    }
}

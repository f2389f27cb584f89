//! Backend operation interface ("Bridge").
//!
//! The query engine, schema analyzer, and migration orchestrator live behind
//! this trait; the gateway resolves an [`Operation`] and forwards an opaque
//! payload. It never interprets result contents, only serializes them back
//! onto the wire.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::status::Failure;

/// Opaque request/response payload.
///
/// REST hands the bridge parsed JSON; gRPC hands it the decoded frame bytes.
/// Either side may come back in either form, and the response writer
/// serializes whichever it gets.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(serde_json::Value),
    Bytes(Bytes),
}

impl Payload {
    /// Raw bytes view, serializing JSON if needed. Used by the gRPC framer.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Payload::Bytes(b) => b,
            Payload::Json(v) => Bytes::from(serde_json::to_vec(&v).unwrap_or_default()),
        }
    }

    /// JSON view of a request payload. Empty bytes decode as `null` so that
    /// bodyless calls (a bare Health ping, a 0-length frame) stay valid.
    pub fn into_json(self) -> Result<serde_json::Value, Failure> {
        match self {
            Payload::Json(v) => Ok(v),
            Payload::Bytes(b) if b.is_empty() => Ok(serde_json::Value::Null),
            Payload::Bytes(b) => serde_json::from_slice(&b)
                .map_err(|e| Failure::invalid_argument(format!("malformed JSON payload: {e}"))),
        }
    }
}

/// Backend operation interface consumed by the gateway.
///
/// Abstracts over deployment shapes the same way the storage side abstracts
/// over shard layouts: the gateway only ever sees `Arc<dyn Bridge>`.
#[async_trait::async_trait]
pub trait Bridge: Send + Sync {
    /// Execute one resolved operation.
    ///
    /// May suspend for as long as the engine needs; the gateway awaits it
    /// inside the per-request task, so transport-level cancellation drops
    /// the call. Failures carry the status kind and message verbatim to the
    /// response writer.
    async fn execute(&self, op: Operation, request: Payload) -> Result<Payload, Failure>;
}

/// Typed shape of a `POST /query` body, validated before forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Query-language text. Required.
    pub query: String,

    /// Optional provenance recorded in the journal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,

    #[serde(default)]
    pub explain: bool,

    #[serde(default)]
    pub analyze: bool,

    #[serde(default)]
    pub verbose: bool,
}

/// Who ran a query, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

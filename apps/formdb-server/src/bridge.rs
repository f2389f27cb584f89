//! In-memory bridge.
//!
//! Stand-in for the query engine used by local runs and integration tests.
//! Collections and the journal live in process memory; query, normalization,
//! and migration calls return small structured payloads so both surfaces can
//! be exercised end to end.

use formdb_gateway::{Bridge, Failure, Operation, Payload};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// In-memory engine stand-in.
#[derive(Default)]
pub struct MemoryBridge {
    collections: RwLock<BTreeMap<String, Value>>,
    journal: RwLock<Vec<Value>>,
    migration_phase: RwLock<Option<&'static str>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, entry: Value) {
        self.journal.write().push(entry);
    }

    fn required_name(request: &Value, field: &str) -> Result<String, Failure> {
        match request.get(field).and_then(Value::as_str) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(Failure::invalid_argument(format!("missing required field '{field}'"))),
        }
    }

    fn advance_migration(
        &self,
        op: Operation,
    ) -> Result<Value, Failure> {
        let mut phase = self.migration_phase.write();
        let next = match (op, *phase) {
            (Operation::MigrationStart, None) => Some("announce"),
            (Operation::MigrationStart, Some(_)) => {
                return Err(Failure::invalid_argument("migration already in progress"))
            }
            (Operation::MigrationShadow, Some(_)) => Some("shadow"),
            (Operation::MigrationCommit, Some(_)) | (Operation::MigrationAbort, Some(_)) => None,
            (_, None) => return Err(Failure::invalid_argument("no migration in progress")),
            (_, Some(_)) => return Err(Failure::internal("not a migration operation")),
        };
        let label = match op {
            Operation::MigrationStart => "announce",
            Operation::MigrationShadow => "shadow",
            Operation::MigrationCommit => "commit",
            Operation::MigrationAbort => "abort",
            _ => "unknown",
        };
        *phase = next;
        self.record(json!({"event": "migration", "phase": label}));
        Ok(json!({ "phase": label }))
    }
}

#[async_trait::async_trait]
impl Bridge for MemoryBridge {
    async fn execute(&self, op: Operation, request: Payload) -> Result<Payload, Failure> {
        let request = request.into_json()?;

        let response = match op {
            Operation::Health => json!({ "status": "healthy" }),

            Operation::Query => {
                // Tolerant of an empty payload: an empty query plans to an
                // empty result rather than an error.
                let query = request
                    .get("query")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                let explain = request.get("explain").and_then(Value::as_bool).unwrap_or(false);
                self.record(json!({
                    "event": "query",
                    "query": query,
                    "provenance": request.get("provenance").cloned().unwrap_or(Value::Null),
                }));
                let mut result = json!({ "rows": [], "row_count": 0, "elapsed_ms": 0 });
                if explain {
                    result["plan"] = json!({ "steps": [] });
                }
                result
            }

            Operation::ListCollections => {
                let names: Vec<String> = self.collections.read().keys().cloned().collect();
                json!({ "collections": names })
            }

            Operation::CreateCollection => {
                let name = Self::required_name(&request, "name")?;
                let fields = request.get("fields").cloned().unwrap_or(Value::Null);
                let mut collections = self.collections.write();
                if collections.contains_key(&name) {
                    return Err(Failure::invalid_argument(format!(
                        "collection '{name}' already exists"
                    )));
                }
                collections.insert(name.clone(), fields.clone());
                drop(collections);
                self.record(json!({ "event": "create_collection", "name": name }));
                json!({ "name": name, "fields": fields })
            }

            Operation::GetCollection => {
                let name = Self::required_name(&request, "collection")?;
                match self.collections.read().get(&name) {
                    Some(fields) => json!({ "name": name, "fields": fields }),
                    None => {
                        return Err(Failure::not_found(format!("collection '{name}' not found")))
                    }
                }
            }

            Operation::DropCollection => {
                let name = Self::required_name(&request, "collection")?;
                if self.collections.write().remove(&name).is_none() {
                    return Err(Failure::not_found(format!("collection '{name}' not found")));
                }
                self.record(json!({ "event": "drop_collection", "name": name }));
                Value::Null
            }

            Operation::GetJournal => {
                json!({ "entries": self.journal.read().clone() })
            }

            Operation::DiscoverDependencies => {
                json!({ "dependencies": [] })
            }

            Operation::AnalyzeNormalForm => {
                json!({ "normal_form": "BCNF", "violations": [] })
            }

            Operation::MigrationStart
            | Operation::MigrationShadow
            | Operation::MigrationCommit
            | Operation::MigrationAbort => self.advance_migration(op)?,

            // The gateway serves metrics from the exporter; this arm exists
            // only for totality.
            Operation::Metrics => {
                return Err(Failure::unimplemented("metrics are served by the exporter"))
            }
        };

        Ok(Payload::Json(response))
    }
}

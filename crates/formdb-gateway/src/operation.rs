//! The shared operation set.
//!
//! Both protocol surfaces resolve to this one enumeration, which is what
//! guarantees REST and gRPC expose the same operations. Wire method names
//! are parsed into the enum once at the boundary; everything past that point
//! dispatches by exhaustive matching.

/// Logical operation resolved from a route or RPC method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Query,
    ListCollections,
    GetCollection,
    CreateCollection,
    DropCollection,
    GetJournal,
    DiscoverDependencies,
    AnalyzeNormalForm,
    MigrationStart,
    MigrationShadow,
    MigrationCommit,
    MigrationAbort,
    Health,
    Metrics,
}

impl Operation {
    /// All operations, in wire order.
    pub const ALL: [Operation; 14] = [
        Operation::Query,
        Operation::ListCollections,
        Operation::GetCollection,
        Operation::CreateCollection,
        Operation::DropCollection,
        Operation::GetJournal,
        Operation::DiscoverDependencies,
        Operation::AnalyzeNormalForm,
        Operation::MigrationStart,
        Operation::MigrationShadow,
        Operation::MigrationCommit,
        Operation::MigrationAbort,
        Operation::Health,
        Operation::Metrics,
    ];

    /// Parse a gRPC method name. Case-sensitive exact match.
    pub fn from_rpc_method(name: &str) -> Option<Operation> {
        match name {
            "Query" => Some(Operation::Query),
            "ListCollections" => Some(Operation::ListCollections),
            "GetCollection" => Some(Operation::GetCollection),
            "CreateCollection" => Some(Operation::CreateCollection),
            "DropCollection" => Some(Operation::DropCollection),
            "GetJournal" => Some(Operation::GetJournal),
            "DiscoverDependencies" => Some(Operation::DiscoverDependencies),
            "AnalyzeNormalForm" => Some(Operation::AnalyzeNormalForm),
            "MigrationStart" => Some(Operation::MigrationStart),
            "MigrationShadow" => Some(Operation::MigrationShadow),
            "MigrationCommit" => Some(Operation::MigrationCommit),
            "MigrationAbort" => Some(Operation::MigrationAbort),
            "Health" => Some(Operation::Health),
            "Metrics" => Some(Operation::Metrics),
            _ => None,
        }
    }

    /// The gRPC method name, also used as the metrics label.
    pub fn rpc_method(self) -> &'static str {
        match self {
            Operation::Query => "Query",
            Operation::ListCollections => "ListCollections",
            Operation::GetCollection => "GetCollection",
            Operation::CreateCollection => "CreateCollection",
            Operation::DropCollection => "DropCollection",
            Operation::GetJournal => "GetJournal",
            Operation::DiscoverDependencies => "DiscoverDependencies",
            Operation::AnalyzeNormalForm => "AnalyzeNormalForm",
            Operation::MigrationStart => "MigrationStart",
            Operation::MigrationShadow => "MigrationShadow",
            Operation::MigrationCommit => "MigrationCommit",
            Operation::MigrationAbort => "MigrationAbort",
            Operation::Health => "Health",
            Operation::Metrics => "Metrics",
        }
    }
}

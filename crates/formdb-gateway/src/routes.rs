//! REST route table and lookup.
//!
//! The table is static data built at compile time and immutable thereafter;
//! lookup is a pure function over it, so routing is deterministic, total,
//! and testable in isolation. An exact pattern always beats a prefix
//! pattern, and among prefix matches the longest literal prefix wins.

use axum::http::Method;

use crate::operation::Operation;

/// Path pattern: an exact endpoint, or a literal prefix followed by exactly
/// one dynamic segment (a resource name).
#[derive(Debug, Clone, Copy)]
pub enum PathPattern {
    Exact(&'static str),
    Prefix(&'static str),
}

/// One immutable (verb, pattern) -> operation association.
#[derive(Debug, Clone)]
pub struct Route {
    pub verb: Method,
    pub pattern: PathPattern,
    pub op: Operation,
}

/// The REST surface. Sub-actions under `/normalize` and `/migrate` are
/// listed as exact endpoints, so selection is by the full trailing segment
/// and can never be confused by one action name containing another.
static ROUTES: &[Route] = &[
    Route { verb: Method::GET, pattern: PathPattern::Exact("/health"), op: Operation::Health },
    Route { verb: Method::GET, pattern: PathPattern::Exact("/metrics"), op: Operation::Metrics },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/query"), op: Operation::Query },
    Route { verb: Method::GET, pattern: PathPattern::Exact("/journal"), op: Operation::GetJournal },
    Route { verb: Method::GET, pattern: PathPattern::Exact("/collections"), op: Operation::ListCollections },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/collections"), op: Operation::CreateCollection },
    Route { verb: Method::GET, pattern: PathPattern::Prefix("/collections/"), op: Operation::GetCollection },
    Route { verb: Method::DELETE, pattern: PathPattern::Prefix("/collections/"), op: Operation::DropCollection },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/normalize/discover"), op: Operation::DiscoverDependencies },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/normalize/analyze"), op: Operation::AnalyzeNormalForm },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/migrate/start"), op: Operation::MigrationStart },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/migrate/shadow"), op: Operation::MigrationShadow },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/migrate/commit"), op: Operation::MigrationCommit },
    Route { verb: Method::POST, pattern: PathPattern::Exact("/migrate/abort"), op: Operation::MigrationAbort },
];

/// Outcome of a route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A route matched. `resource` is the trailing dynamic segment, if the
    /// pattern has one.
    Matched {
        op: Operation,
        resource: Option<String>,
    },
    /// No pattern matched the path.
    NotFound,
    /// Some pattern matched the path, but not with this verb.
    MethodNotSupported,
}

/// Resolve a (verb, endpoint) pair against the route table.
///
/// `endpoint` is the path with the version prefix already stripped.
/// Trailing slashes are equivalent to their absence, which is also what
/// makes a bare `/collections/` resolve as a listing (no name) rather than
/// as an empty-string name.
pub fn resolve(verb: &Method, endpoint: &str) -> Resolution {
    let trimmed = endpoint.trim_end_matches('/');
    let endpoint = if trimmed.is_empty() { "/" } else { trimmed };

    // specificity: usize::MAX for exact, prefix length otherwise
    let mut best: Option<(&Route, Option<&str>, usize)> = None;
    let mut verb_mismatch = false;

    for route in ROUTES {
        let (resource, specificity) = match route.pattern {
            PathPattern::Exact(p) => {
                if endpoint != p {
                    continue;
                }
                (None, usize::MAX)
            }
            PathPattern::Prefix(p) => match endpoint.strip_prefix(p) {
                Some(rest) if !rest.is_empty() && !rest.contains('/') => (Some(rest), p.len()),
                _ => continue,
            },
        };
        if route.verb != *verb {
            verb_mismatch = true;
            continue;
        }
        match best {
            Some((_, _, s)) if s >= specificity => {}
            _ => best = Some((route, resource, specificity)),
        }
    }

    match best {
        Some((route, resource, _)) => Resolution::Matched {
            op: route.op,
            resource: resource.map(str::to_string),
        },
        None if verb_mismatch => Resolution::MethodNotSupported,
        None => Resolution::NotFound,
    }
}

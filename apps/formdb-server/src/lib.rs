//! FormDB server library.
//!
//! Exposes the server components for integration testing.

pub mod auth;
pub mod bridge;
pub mod config;
pub mod metrics;

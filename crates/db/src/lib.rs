//! Storage layer for Finaizen.
//!
//! This crate provides:
//! - An in-memory store implementing the core repository traits
//! - JSON snapshots to persist that store between runs

pub mod repositories;
pub mod snapshot;

pub use repositories::InMemoryStore;
pub use snapshot::{Snapshot, SnapshotError};

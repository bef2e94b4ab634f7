//! Persistence abstractions for checklist state.
//!
//! # Responsibility
//! - Define the key-value store contract the service persists through.
//! - Isolate SQLite and JSON details from the tree manager.
//!
//! # Invariants
//! - Stores hold whole snapshots only.
//! - Store APIs return semantic errors (`InvalidData`) in addition to DB
//!   transport errors.

pub mod state_repo;

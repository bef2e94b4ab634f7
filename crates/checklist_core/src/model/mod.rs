//! Checklist domain model.
//!
//! # Responsibility
//! - Define the category/subcategory tree and its tri-state rules.
//! - Provide the default template and the summary label.
//!
//! # Invariants
//! - Every node is identified by an id allocated once at construction.
//! - Derived flags are recomputed from scratch on every mutation.

pub mod checklist;
pub mod summary;
pub mod template;

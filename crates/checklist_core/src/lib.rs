//! Tri-state checklist core.
//! This crate owns checkbox propagation rules and their persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::ChecklistConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::checklist::{
    Category, CategoryId, CheckState, ChecklistTree, SnapshotValidationError, Subcategory,
    SubcategoryId, TreeError,
};
pub use model::summary::ChecklistSummary;
pub use model::template::{default_tree, ChecklistTemplate, IdSequence};
pub use repo::state_repo::{
    SqliteStateStore, StateKey, StateStore, StoreError, StoreResult, STATE_KEY,
};
pub use service::checklist_service::{ChecklistError, ChecklistResult, ChecklistService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

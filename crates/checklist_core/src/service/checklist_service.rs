//! Checklist state manager.
//!
//! # Responsibility
//! - Apply user toggles to the in-memory tree.
//! - Persist the full snapshot after every mutation.
//! - Keep the summary label in step with the tree and panel state.
//!
//! # Invariants
//! - A toggle addressing an unknown id changes nothing and writes nothing.
//! - A failed write leaves the in-memory mutation applied.
//! - The panel-visible flag is session state and never persisted.

use crate::model::checklist::{CategoryId, ChecklistTree, SubcategoryId, TreeError};
use crate::model::summary::ChecklistSummary;
use crate::model::template::default_tree;
use crate::repo::state_repo::{StateStore, StoreError, STATE_KEY};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ChecklistResult<T> = Result<T, ChecklistError>;

/// Errors from checklist service operations.
#[derive(Debug)]
pub enum ChecklistError {
    /// Target category is not in the tree.
    CategoryNotFound(CategoryId),
    /// Target subcategory is not in the tree.
    SubcategoryNotFound(SubcategoryId),
    /// Store-level failure.
    Store(StoreError),
}

impl Display for ChecklistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::SubcategoryNotFound(id) => write!(f, "subcategory not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChecklistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for ChecklistError {
    fn from(value: TreeError) -> Self {
        match value {
            TreeError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            TreeError::SubcategoryNotFound(id) => Self::SubcategoryNotFound(id),
        }
    }
}

impl From<StoreError> for ChecklistError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Checklist facade owning the tree, panel state and store.
pub struct ChecklistService<S: StateStore> {
    store: S,
    tree: ChecklistTree,
    panel_open: bool,
    summary: ChecklistSummary,
}

impl<S: StateStore> ChecklistService<S> {
    /// Creates a service over the default 5 x 4 tree.
    pub fn new(store: S) -> Self {
        Self::with_tree(store, default_tree())
    }

    /// Creates a service over a caller-built tree.
    pub fn with_tree(store: S, tree: ChecklistTree) -> Self {
        let summary = ChecklistSummary::compute(&tree, false);
        Self {
            store,
            tree,
            panel_open: false,
            summary,
        }
    }

    pub fn tree(&self) -> &ChecklistTree {
        &self.tree
    }

    pub fn summary(&self) -> ChecklistSummary {
        self.summary
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the in-memory tree with the stored snapshot, if one exists.
    ///
    /// Returns `true` when a snapshot was found. Without one, the current
    /// tree is kept.
    pub fn load(&mut self) -> ChecklistResult<bool> {
        let started_at = Instant::now();
        match self.store.get_state(STATE_KEY) {
            Ok(Some(tree)) => {
                self.tree = tree;
                self.refresh_summary();
                info!(
                    "event=state_load module=service status=ok found=true duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(true)
            }
            Ok(None) => {
                self.refresh_summary();
                info!(
                    "event=state_load module=service status=ok found=false duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(false)
            }
            Err(err) => {
                error!(
                    "event=state_load module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Like [`Self::load`], but keeps the current tree on store failure.
    pub fn load_or_default(&mut self) -> bool {
        match self.load() {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    "event=state_load module=service status=fallback reason=store_error error={}",
                    err
                );
                self.refresh_summary();
                false
            }
        }
    }

    /// Flips the global checkbox and applies it to every node.
    pub fn toggle_all(&mut self) -> ChecklistResult<()> {
        self.tree.toggle_all();
        debug!(
            "event=toggle_all module=service status=ok all_checked={}",
            self.tree.all_checked
        );
        self.save()
    }

    /// Flips one category together with all of its subcategories.
    pub fn toggle_category(&mut self, id: CategoryId) -> ChecklistResult<()> {
        self.tree.toggle_category(id)?;
        debug!("event=toggle_category module=service status=ok category_id={id}");
        self.save()
    }

    /// Flips one subcategory and re-derives its category and global flags.
    pub fn toggle_subcategory(&mut self, id: SubcategoryId) -> ChecklistResult<()> {
        self.tree.toggle_subcategory(id)?;
        debug!("event=toggle_subcategory module=service status=ok subcategory_id={id}");
        self.save()
    }

    /// Expands one category and collapses the rest, or collapses it if open.
    pub fn toggle_category_open(&mut self, id: CategoryId) -> ChecklistResult<()> {
        self.tree.toggle_category_open(id)?;
        self.save()
    }

    /// Hides the panel and collapses every category.
    pub fn close_checklist(&mut self) -> ChecklistResult<()> {
        self.panel_open = false;
        self.tree.close_all_categories();
        self.save()
    }

    /// Shows or hides the panel; every category is collapsed either way.
    pub fn toggle_checklist(&mut self) -> ChecklistResult<()> {
        self.panel_open = !self.panel_open;
        self.tree.close_all_categories();
        self.save()
    }

    /// Returns whether a snapshot is currently stored.
    pub fn has_saved_state(&self) -> ChecklistResult<bool> {
        self.store.has_state(STATE_KEY).map_err(Into::into)
    }

    /// Deletes the stored snapshot and returns to the default tree.
    pub fn clear_saved_state(&mut self) -> ChecklistResult<()> {
        self.store.delete_state(STATE_KEY)?;
        self.tree = default_tree();
        self.refresh_summary();
        info!("event=state_clear module=service status=ok");
        Ok(())
    }

    fn save(&mut self) -> ChecklistResult<()> {
        self.refresh_summary();
        let started_at = Instant::now();
        match self.store.put_state(STATE_KEY, &self.tree) {
            Ok(()) => {
                debug!(
                    "event=state_save module=service status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=state_save module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn refresh_summary(&mut self) {
        self.summary = ChecklistSummary::compute(&self.tree, self.panel_open);
    }
}

//! Checklist tree domain model.
//!
//! # Responsibility
//! - Define the category/subcategory tree and its persisted snapshot shape.
//! - Own the tri-state derivation (leaf -> category -> global).
//!
//! # Invariants
//! - `checked && indeterminate` is never true at any level after a mutation.
//! - Category flags are always derived from subcategory flags.
//! - Global flags are always derived from the full tree.
//! - Ids are unique within their kind and never reassigned.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

macro_rules! node_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

node_id!(CategoryId);
node_id!(SubcategoryId);

/// Tri-state value of a checkbox derived from its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl CheckState {
    /// Derives parent state from child checked flags.
    ///
    /// An empty child set is vacuously fully checked: `all()` over nothing is
    /// true and `any()` is false, so the result is `Checked`, never
    /// `Indeterminate`.
    pub fn from_children(children: impl IntoIterator<Item = bool>) -> Self {
        let mut total = 0usize;
        let mut checked = 0usize;
        for child in children {
            total += 1;
            if child {
                checked += 1;
            }
        }

        match (total, checked) {
            (0, _) => Self::Checked,
            (total, checked) if checked == total => Self::Checked,
            (_, 0) => Self::Unchecked,
            _ => Self::Indeterminate,
        }
    }

    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }

    pub fn is_indeterminate(self) -> bool {
        self == Self::Indeterminate
    }
}

/// Leaf selectable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    pub checked: bool,
    /// CSS color string shown next to the item, e.g. `#99CCFD`.
    pub color: String,
}

/// Top-level grouping node with an ordered list of subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub checked: bool,
    /// Whether the category is expanded in the panel.
    pub open: bool,
    pub indeterminate: bool,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    /// Recomputes `checked`/`indeterminate` from subcategory flags.
    pub fn refresh_flags(&mut self) {
        let state = CheckState::from_children(self.subcategories.iter().map(|sub| sub.checked));
        self.checked = state.is_checked();
        self.indeterminate = state.is_indeterminate();
    }

    /// Sets this category and every subcategory to `checked`.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        for sub in &mut self.subcategories {
            sub.checked = checked;
        }
        self.indeterminate = false;
    }

    pub fn check_state(&self) -> CheckState {
        if self.indeterminate {
            CheckState::Indeterminate
        } else if self.checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    pub fn checked_subcategory_count(&self) -> usize {
        self.subcategories.iter().filter(|sub| sub.checked).count()
    }

    /// Checked by its own flag and by every subcategory.
    pub fn is_fully_checked(&self) -> bool {
        self.checked && self.subcategories.iter().all(|sub| sub.checked)
    }

    /// Checked by its own flag or by at least one subcategory.
    pub fn has_selection(&self) -> bool {
        self.checked || self.subcategories.iter().any(|sub| sub.checked)
    }
}

/// Errors for operations addressing a node that is not in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    CategoryNotFound(CategoryId),
    SubcategoryNotFound(SubcategoryId),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::SubcategoryNotFound(id) => write!(f, "subcategory not found: {id}"),
        }
    }
}

impl Error for TreeError {}

/// Structural problems found in a snapshot read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotValidationError {
    /// Category is both checked and indeterminate.
    ConflictingCategoryFlags(CategoryId),
    /// `allChecked` and `allIndeterminate` are both set.
    ConflictingGlobalFlags,
    DuplicateCategoryId(CategoryId),
    DuplicateSubcategoryId(SubcategoryId),
    /// Category flags disagree with its subcategories.
    StaleCategoryFlags(CategoryId),
    /// `allChecked`/`allIndeterminate` disagree with the categories.
    StaleGlobalFlags,
}

impl Display for SnapshotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConflictingCategoryFlags(id) => {
                write!(f, "category {id} is both checked and indeterminate")
            }
            Self::ConflictingGlobalFlags => {
                write!(f, "allChecked and allIndeterminate are both set")
            }
            Self::DuplicateCategoryId(id) => write!(f, "duplicate category id {id}"),
            Self::DuplicateSubcategoryId(id) => write!(f, "duplicate subcategory id {id}"),
            Self::StaleCategoryFlags(id) => {
                write!(f, "category {id} flags do not match its subcategories")
            }
            Self::StaleGlobalFlags => {
                write!(f, "allChecked/allIndeterminate do not match the categories")
            }
        }
    }
}

impl Error for SnapshotValidationError {}

/// Whole checklist state; also the persisted snapshot shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTree {
    pub all_checked: bool,
    pub all_indeterminate: bool,
    pub categories: Vec<Category>,
}

impl ChecklistTree {
    /// Builds a tree and derives every flag from subcategory state.
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let mut tree = Self {
            all_checked: false,
            all_indeterminate: false,
            categories,
        };
        for category in &mut tree.categories {
            category.refresh_flags();
        }
        tree.refresh_global_flags();
        tree
    }

    /// Flips the global flag and applies it to every node.
    pub fn toggle_all(&mut self) {
        let checked = !self.all_checked;
        self.all_checked = checked;
        self.all_indeterminate = false;
        for category in &mut self.categories {
            category.set_checked(checked);
        }
        self.refresh_global_flags();
    }

    /// Flips one category and propagates the value to its subcategories.
    pub fn toggle_category(&mut self, id: CategoryId) -> Result<(), TreeError> {
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or(TreeError::CategoryNotFound(id))?;
        let checked = !category.checked;
        category.set_checked(checked);
        category.refresh_flags();
        self.refresh_global_flags();
        Ok(())
    }

    /// Flips one subcategory and re-derives its owner and the global flags.
    pub fn toggle_subcategory(&mut self, id: SubcategoryId) -> Result<(), TreeError> {
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.subcategories.iter().any(|sub| sub.id == id))
            .ok_or(TreeError::SubcategoryNotFound(id))?;
        if let Some(sub) = category.subcategories.iter_mut().find(|sub| sub.id == id) {
            sub.checked = !sub.checked;
        }
        category.refresh_flags();
        self.refresh_global_flags();
        Ok(())
    }

    /// Expands or collapses one category; every other category is collapsed.
    pub fn toggle_category_open(&mut self, id: CategoryId) -> Result<(), TreeError> {
        if self.category(id).is_none() {
            return Err(TreeError::CategoryNotFound(id));
        }
        for category in &mut self.categories {
            if category.id == id {
                category.open = !category.open;
            } else {
                category.open = false;
            }
        }
        Ok(())
    }

    pub fn close_all_categories(&mut self) {
        for category in &mut self.categories {
            category.open = false;
        }
    }

    /// Recomputes `all_checked`/`all_indeterminate` from the full tree.
    pub fn refresh_global_flags(&mut self) {
        (self.all_checked, self.all_indeterminate) = self.derived_global_flags();
    }

    /// `(all_checked, all_indeterminate)` as implied by the categories.
    fn derived_global_flags(&self) -> (bool, bool) {
        // An empty tree is vacuously fully checked, mirroring `CheckState`.
        let all_checked = self.categories.iter().all(Category::is_fully_checked);
        let some_checked = self.categories.iter().any(Category::has_selection);
        (all_checked, some_checked && !all_checked)
    }

    pub fn global_state(&self) -> CheckState {
        if self.all_indeterminate {
            CheckState::Indeterminate
        } else if self.all_checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn subcategory(&self, id: SubcategoryId) -> Option<&Subcategory> {
        self.categories
            .iter()
            .flat_map(|category| category.subcategories.iter())
            .find(|sub| sub.id == id)
    }

    /// Returns the currently expanded category, if any.
    pub fn open_category(&self) -> Option<&Category> {
        self.categories.iter().find(|category| category.open)
    }

    /// Returns `(fully checked categories, checked subcategories)`.
    pub fn checked_counts(&self) -> (usize, usize) {
        let categories = self
            .categories
            .iter()
            .filter(|category| category.checked)
            .count();
        let subcategories = self
            .categories
            .iter()
            .map(Category::checked_subcategory_count)
            .sum();
        (categories, subcategories)
    }

    /// Checks structural invariants of a snapshot, including that every
    /// stored flag equals the one derived from the subcategories.
    ///
    /// Used on read paths so corrupted stored state is rejected instead of
    /// being rendered.
    pub fn validate(&self) -> Result<(), SnapshotValidationError> {
        if self.all_checked && self.all_indeterminate {
            return Err(SnapshotValidationError::ConflictingGlobalFlags);
        }

        let mut category_ids = HashSet::new();
        let mut subcategory_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id) {
                return Err(SnapshotValidationError::DuplicateCategoryId(category.id));
            }
            if category.checked && category.indeterminate {
                return Err(SnapshotValidationError::ConflictingCategoryFlags(
                    category.id,
                ));
            }
            for sub in &category.subcategories {
                if !subcategory_ids.insert(sub.id) {
                    return Err(SnapshotValidationError::DuplicateSubcategoryId(sub.id));
                }
            }
            let derived =
                CheckState::from_children(category.subcategories.iter().map(|sub| sub.checked));
            if category.check_state() != derived {
                return Err(SnapshotValidationError::StaleCategoryFlags(category.id));
            }
        }

        if (self.all_checked, self.all_indeterminate) != self.derived_global_flags() {
            return Err(SnapshotValidationError::StaleGlobalFlags);
        }
        Ok(())
    }
}

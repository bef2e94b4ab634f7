//! Default checklist template and id allocation.
//!
//! # Responsibility
//! - Describe the fixed category names and subcategory template.
//! - Assign sequential ids while building a tree.
//!
//! # Invariants
//! - Ids start at 1 and increase by one per allocated node.
//! - Allocation state lives in the builder; no process-wide counter exists.

use crate::model::checklist::{Category, CategoryId, ChecklistTree, Subcategory, SubcategoryId};

/// Category names of the default checklist, in display order.
pub const DEFAULT_CATEGORY_NAMES: [&str; 5] = [
    "Продажи",
    "Сотрудники",
    "Партнёры",
    "Ивент",
    "Входящие обращения",
];

/// Subcategory `(name, color)` pairs repeated under every category.
pub const DEFAULT_SUBCATEGORY_TEMPLATE: [(&str, &str); 4] = [
    ("Неразобранное", "#99CCFD"),
    ("Переговоры", "#FFFF99"),
    ("Принимают решение", "#FFCC66"),
    ("Успешно", "#CCFF66"),
];

/// Monotonic id source scoped to one tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Template the initial tree is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistTemplate {
    pub category_names: Vec<String>,
    /// `(name, color)` for each subcategory created under every category.
    pub subcategories: Vec<(String, String)>,
}

impl Default for ChecklistTemplate {
    fn default() -> Self {
        Self {
            category_names: DEFAULT_CATEGORY_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            subcategories: DEFAULT_SUBCATEGORY_TEMPLATE
                .iter()
                .map(|(name, color)| ((*name).to_string(), (*color).to_string()))
                .collect(),
        }
    }
}

impl ChecklistTemplate {
    /// Builds a fresh unchecked, fully collapsed tree.
    ///
    /// Category and subcategory ids come from two independent sequences.
    pub fn build(&self) -> ChecklistTree {
        let mut category_ids = IdSequence::new();
        let mut subcategory_ids = IdSequence::new();

        let categories = self
            .category_names
            .iter()
            .map(|name| Category {
                id: CategoryId::new(category_ids.next_id()),
                name: name.clone(),
                checked: false,
                open: false,
                indeterminate: false,
                subcategories: self.build_subcategories(&mut subcategory_ids),
            })
            .collect();

        ChecklistTree::from_categories(categories)
    }

    fn build_subcategories(&self, ids: &mut IdSequence) -> Vec<Subcategory> {
        self.subcategories
            .iter()
            .map(|(name, color)| Subcategory {
                id: SubcategoryId::new(ids.next_id()),
                name: name.clone(),
                checked: false,
                color: color.clone(),
            })
            .collect()
    }
}

/// Builds the default 5 x 4 checklist.
pub fn default_tree() -> ChecklistTree {
    ChecklistTemplate::default().build()
}

#[cfg(test)]
mod tests {
    use super::{default_tree, ChecklistTemplate, IdSequence};
    use crate::model::checklist::{CategoryId, SubcategoryId};

    #[test]
    fn id_sequence_is_monotonic_from_start() {
        let mut ids = IdSequence::starting_at(7);
        assert_eq!(ids.next_id(), 7);
        assert_eq!(ids.next_id(), 8);
    }

    #[test]
    fn default_tree_has_five_categories_of_four() {
        let tree = default_tree();
        assert_eq!(tree.categories.len(), 5);
        assert!(tree
            .categories
            .iter()
            .all(|category| category.subcategories.len() == 4));
        assert_eq!(tree.categories[0].name, "Продажи");
        assert_eq!(tree.categories[0].subcategories[0].color, "#99CCFD");
        assert!(!tree.all_checked);
        assert!(!tree.all_indeterminate);
    }

    #[test]
    fn ids_are_sequential_across_categories() {
        let tree = default_tree();
        assert_eq!(tree.categories[4].id, CategoryId::new(5));
        assert_eq!(tree.categories[1].subcategories[0].id, SubcategoryId::new(5));
        assert_eq!(tree.categories[4].subcategories[3].id, SubcategoryId::new(20));
    }

    #[test]
    fn building_twice_restarts_ids() {
        let template = ChecklistTemplate::default();
        assert_eq!(template.build(), template.build());
    }
}

//! Human-readable checklist summary.

use crate::model::checklist::ChecklistTree;
use std::fmt::{Display, Formatter};

/// Label shown on the collapsed checklist control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistSummary {
    /// Panel open and everything selected.
    DeselectAll,
    /// Panel open and not everything selected.
    SelectAll,
    /// Number of checked categories and checked subcategories.
    Counts {
        categories: usize,
        subcategories: usize,
    },
}

impl ChecklistSummary {
    pub fn compute(tree: &ChecklistTree, panel_open: bool) -> Self {
        if panel_open {
            return if tree.all_checked {
                Self::DeselectAll
            } else {
                Self::SelectAll
            };
        }

        let (categories, subcategories) = tree.checked_counts();
        Self::Counts {
            categories,
            subcategories,
        }
    }
}

impl Display for ChecklistSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeselectAll => write!(f, "Снять выделение"),
            Self::SelectAll => write!(f, "Выбрать всё"),
            Self::Counts {
                categories,
                subcategories,
            } => write!(f, "{categories} воронки, {subcategories} этапа"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChecklistSummary;
    use crate::model::template::default_tree;

    #[test]
    fn open_panel_switches_to_action_labels() {
        let mut tree = default_tree();
        assert_eq!(
            ChecklistSummary::compute(&tree, true),
            ChecklistSummary::SelectAll
        );

        tree.toggle_all();
        assert_eq!(
            ChecklistSummary::compute(&tree, true),
            ChecklistSummary::DeselectAll
        );
        assert_eq!(
            ChecklistSummary::compute(&tree, false),
            ChecklistSummary::Counts {
                categories: 5,
                subcategories: 20
            }
        );
    }

    #[test]
    fn display_renders_counts() {
        let summary = ChecklistSummary::Counts {
            categories: 2,
            subcategories: 9,
        };
        assert_eq!(summary.to_string(), "2 воронки, 9 этапа");
        assert_eq!(ChecklistSummary::SelectAll.to_string(), "Выбрать всё");
    }
}

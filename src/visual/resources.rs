// src/visual/resources.rs

use bevy::prelude::*;
use std::sync::Arc;

use crate::host::TableSnapshot;
use crate::ranking::model::RankedTableModel;
use crate::ranking::view::TableView;
use crate::visual::definitions::{
    ColumnDescriptor, FilterInfo, GroupCriterion, SortCriterion,
};
use crate::visual::extract::ColorLedger;
use crate::visual::settings::VisualSettings;

/// The engine's authoritative state: the accepted-column list, the memory of
/// user intent (sort/group/filter), and the model/view pair it owns.
///
/// `column_state` diverges from "this snapshot's columns" whenever the user
/// has reordered or removed columns, or the host has added/removed columns
/// between cycles. It is appended to when a snapshot grows, pruned when one
/// shrinks, and reordered only by explicit user gesture.
#[derive(Resource, Default)]
pub struct VisualState {
    pub column_state: Vec<ColumnDescriptor>,
    pub sort_criteria: Vec<SortCriterion>,
    pub group_criteria: Vec<GroupCriterion>,
    pub group_sort_criteria: Vec<SortCriterion>,
    pub filter: Option<FilterInfo>,
    /// Session-wide palette assignments for number columns.
    pub colors: ColorLedger,
    pub settings: VisualSettings,
    pub(crate) model: Option<RankedTableModel>,
    pub(crate) view: Option<Box<dyn TableView>>,
    /// The snapshot the model currently holds; compared by pointer identity
    /// to decide whether a cycle carries new data.
    pub(crate) last_table: Option<Arc<TableSnapshot>>,
    /// Column count of the previous snapshot; the merge policy's growth /
    /// shrink decisions compare against this, not against the accepted list.
    pub(crate) last_column_count: usize,
}

impl VisualState {
    pub fn model(&self) -> Option<&RankedTableModel> {
        self.model.as_ref()
    }

    /// Reconciles the accepted-column list against a freshly extracted
    /// column set. `prev_count` is the column count the model held before
    /// this cycle. Returns the entry dropped by the shrink path, if any, so
    /// dependent criteria can be pruned.
    pub fn reconcile_columns(
        &mut self,
        prev_count: usize,
        new_columns: &[ColumnDescriptor],
    ) -> Option<ColumnDescriptor> {
        let new_count = new_columns.len();
        if new_count > prev_count {
            // Columns are only ever appended by the host; the newcomer is
            // the tail of the new list.
            if let Some(added) = new_columns.last() {
                info!("Accepting appended column '{}'.", added.label);
                self.column_state.push(added.clone());
            }
            None
        } else if new_count == prev_count && self.column_state.is_empty() {
            // Recover from an empty accepted list by seeding the tail column.
            if let Some(last) = new_columns.last() {
                self.column_state.push(last.clone());
            }
            None
        } else if new_count < prev_count {
            self.remove_first_absent(new_columns)
        } else {
            None
        }
    }

    /// Shrink path: refresh positional indices of surviving entries by
    /// label, then drop the first entry with no same-label column in the
    /// new set. One removal per cycle.
    fn remove_first_absent(
        &mut self,
        new_columns: &[ColumnDescriptor],
    ) -> Option<ColumnDescriptor> {
        let mut first_absent: Option<usize> = None;
        for (i, entry) in self.column_state.iter_mut().enumerate() {
            match new_columns.iter().find(|c| c.label == entry.label) {
                Some(found) => {
                    entry.source_index = found.source_index;
                }
                None => {
                    if first_absent.is_none() {
                        first_absent = Some(i);
                    }
                }
            }
        }
        first_absent.map(|i| {
            let removed = self.column_state.remove(i);
            info!("Column '{}' left the dataset.", removed.label);
            removed
        })
    }

    /// Drops remembered grouping criteria that referenced a removed column.
    pub fn prune_group_criteria(&mut self, label: &str) {
        self.group_criteria.retain(|g| g.label != label);
        self.group_sort_criteria.retain(|s| s.label != label);
    }

    /// Appends any grouping column not already remembered, by label.
    /// Remembered groupings are never removed here.
    pub fn merge_group_criteria(&mut self, incoming: &[GroupCriterion]) {
        for criterion in incoming {
            if !self.group_criteria.iter().any(|g| g.label == criterion.label) {
                self.group_criteria.push(criterion.clone());
            }
        }
    }

    /// Same append-by-label policy for the within-group sort order.
    pub fn merge_group_sort_criteria(&mut self, incoming: &[SortCriterion]) {
        for criterion in incoming {
            if !self
                .group_sort_criteria
                .iter()
                .any(|s| s.label == criterion.label)
            {
                self.group_sort_criteria.push(criterion.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::definitions::ColumnKind;

    fn desc(label: &str, index: usize) -> ColumnDescriptor {
        ColumnDescriptor::new_basic(label, ColumnKind::String, index)
    }

    fn labels(state: &VisualState) -> Vec<&str> {
        state.column_state.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn grown_snapshot_appends_the_tail_column() {
        let mut state = VisualState::default();
        state.column_state = vec![desc("A", 0), desc("B", 1)];
        let removed =
            state.reconcile_columns(2, &[desc("A", 0), desc("B", 1), desc("C", 2)]);
        assert!(removed.is_none());
        assert_eq!(labels(&state), vec!["A", "B", "C"]);
    }

    #[test]
    fn equal_count_seeds_an_empty_list_with_the_tail() {
        let mut state = VisualState::default();
        let removed = state.reconcile_columns(2, &[desc("A", 0), desc("B", 1)]);
        assert!(removed.is_none());
        assert_eq!(labels(&state), vec!["B"]);
    }

    #[test]
    fn equal_count_with_accepted_columns_is_a_no_op() {
        let mut state = VisualState::default();
        state.column_state = vec![desc("A", 0), desc("B", 1)];
        let removed = state.reconcile_columns(2, &[desc("A", 0), desc("B", 1)]);
        assert!(removed.is_none());
        assert_eq!(labels(&state), vec!["A", "B"]);
    }

    #[test]
    fn shrunk_snapshot_removes_the_first_absent_entry() {
        let mut state = VisualState::default();
        state.column_state = vec![desc("A", 0), desc("B", 1), desc("C", 2)];
        let surviving_id = state.column_state[2].id;
        let removed = state.reconcile_columns(3, &[desc("A", 0), desc("C", 1)]);
        assert_eq!(removed.expect("one entry removed").label, "B");
        assert_eq!(labels(&state), vec!["A", "C"]);
        // Surviving entries keep their identity but carry the new
        // snapshot's positions.
        assert_eq!(state.column_state[1].id, surviving_id);
        assert_eq!(state.column_state[1].source_index, 1);
    }

    #[test]
    fn shrink_removes_only_one_absent_entry_per_cycle() {
        let mut state = VisualState::default();
        state.column_state = vec![desc("A", 0), desc("B", 1), desc("C", 2)];
        let removed = state.reconcile_columns(3, &[desc("C", 0)]);
        assert_eq!(removed.expect("one entry removed").label, "A");
        assert_eq!(labels(&state), vec!["B", "C"]);
    }

    #[test]
    fn group_criteria_merge_appends_new_labels_only() {
        let mut state = VisualState::default();
        state.merge_group_criteria(&[GroupCriterion {
            label: "Region".to_string(),
        }]);
        state.merge_group_criteria(&[
            GroupCriterion {
                label: "Region".to_string(),
            },
            GroupCriterion {
                label: "Tier".to_string(),
            },
        ]);
        let labels: Vec<&str> = state.group_criteria.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Region", "Tier"]);
    }

    #[test]
    fn pruning_drops_group_and_group_sort_entries() {
        let mut state = VisualState::default();
        state.group_criteria = vec![
            GroupCriterion {
                label: "Region".to_string(),
            },
            GroupCriterion {
                label: "Tier".to_string(),
            },
        ];
        state.group_sort_criteria = vec![SortCriterion {
            label: "Region".to_string(),
            ascending: true,
        }];
        state.prune_group_criteria("Region");
        assert_eq!(state.group_criteria.len(), 1);
        assert_eq!(state.group_criteria[0].label, "Tier");
        assert!(state.group_sort_criteria.is_empty());
    }
}

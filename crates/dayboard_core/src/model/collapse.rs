//! Per-column collapse flags.
//!
//! Persisted independently of the board under its own storage key. Missing
//! entries mean "expanded".

use super::column::ColumnId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from day-column id to collapsed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseFlags(BTreeMap<ColumnId, bool>);

impl CollapseFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, column_id: &ColumnId) -> bool {
        self.0.get(column_id).copied().unwrap_or(false)
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self, column_id: &ColumnId) -> bool {
        let entry = self.0.entry(column_id.clone()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Moves a flag to the id a renumbered column now uses.
    pub fn rekey(&mut self, old_id: &ColumnId, new_id: &ColumnId) {
        if old_id == new_id {
            return;
        }
        if let Some(value) = self.0.remove(old_id) {
            self.0.insert(new_id.clone(), value);
        } else {
            self.0.remove(new_id);
        }
    }

    /// Drops the flag of a removed column. Returns whether anything changed.
    pub fn forget(&mut self, column_id: &ColumnId) -> bool {
        self.0.remove(column_id).is_some()
    }

    /// Drops flags whose column fails `keep`. Returns how many were dropped.
    pub fn prune(&mut self, keep: impl Fn(&ColumnId) -> bool) -> usize {
        let before = self.0.len();
        self.0.retain(|column_id, _| keep(column_id));
        before - self.0.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

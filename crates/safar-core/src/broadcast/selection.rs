//! Selection set for the next broadcast.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::directory::Directory;

/// Label of the combined "select all / deselect all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllLabel {
    SelectAll,
    DeselectAll,
}

/// Recipient ids included in the next broadcast.
///
/// Ids are not checked against the directory. An id whose recipient has since
/// been removed stays in the set and is skipped when its turn comes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// True when the selection has as many members as `ids`.
    ///
    /// Compares cardinality only; `ids` always come from the same directory
    /// the selection was built from.
    pub fn is_select_all_state(&self, ids: &[String]) -> bool {
        self.ids.len() == ids.len()
    }

    /// The combined control: deselect everything when fully selected,
    /// otherwise select all of `ids`.
    pub fn toggle_all(&mut self, ids: &[String]) {
        if self.is_select_all_state(ids) {
            self.deselect_all();
        } else {
            self.select_all(ids.iter().cloned());
        }
    }

    /// What the combined control should offer for the visible `ids`.
    pub fn select_all_label(&self, ids: &[String]) -> SelectAllLabel {
        if !ids.is_empty() && self.is_select_all_state(ids) {
            SelectAllLabel::DeselectAll
        } else {
            SelectAllLabel::SelectAll
        }
    }

    /// Freeze the selection into a broadcast order: directory order first,
    /// then ids no longer in the directory, sorted.
    pub fn snapshot(&self, directory: &Directory) -> Vec<String> {
        let mut known: Vec<(usize, &String)> = Vec::with_capacity(self.ids.len());
        let mut stale: Vec<&String> = Vec::new();

        for id in &self.ids {
            match directory.position(id) {
                Some(pos) => known.push((pos, id)),
                None => stale.push(id),
            }
        }

        known.sort_by_key(|(pos, _)| *pos);
        stale.sort();

        known
            .into_iter()
            .map(|(_, id)| id.clone())
            .chain(stale.into_iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Selection state for table rows.
//!
//! Selection tracks record keys rather than positions or references, so it
//! survives sorting, paging, filtering and the host replacing the collection
//! with a fresh copy.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Selecting a row evicts the previous one
    Single,
    /// Any number of rows
    #[default]
    Multiple,
}

impl SelectionMode {
    pub fn from_multi(multi_select: bool) -> Self {
        if multi_select {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        }
    }
}

/// Key-based selection set.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectionMode,
    selected: HashSet<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch mode. Going to single mode keeps at most one key.
    /// Returns whether the set changed.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        self.mode = mode;
        if mode == SelectionMode::Single && self.selected.len() > 1 {
            let keep = self.keys().into_iter().next();
            self.selected.retain(|k| Some(k) == keep.as_ref());
            return true;
        }
        false
    }

    /// All selected keys (sorted for deterministic ordering).
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.selected.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.selected.is_empty();
        self.selected.clear();
        had_any
    }

    /// Add a key. In single mode any other key is evicted.
    /// Returns whether the set changed.
    pub fn select(&mut self, key: &str) -> bool {
        match self.mode {
            SelectionMode::Single => {
                if self.selected.len() == 1 && self.selected.contains(key) {
                    return false;
                }
                self.selected.clear();
                self.selected.insert(key.to_string())
            }
            SelectionMode::Multiple => self.selected.insert(key.to_string()),
        }
    }

    /// Remove a key. Returns whether it was selected.
    pub fn deselect(&mut self, key: &str) -> bool {
        self.selected.remove(key)
    }

    /// Flip membership of a key. Always changes the set.
    pub fn toggle(&mut self, key: &str) {
        if !self.selected.remove(key) {
            self.select(key);
        }
    }

    /// Select every key in `keys`. In single mode only the first one sticks.
    /// Returns whether the set changed.
    pub fn select_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) -> bool {
        match self.mode {
            SelectionMode::Single => keys.into_iter().next().is_some_and(|k| self.select(k)),
            SelectionMode::Multiple => keys
                .into_iter()
                .fold(false, |changed, k| self.selected.insert(k.to_string()) || changed),
        }
    }

    /// Whether every key in `keys` is selected and there is at least one.
    pub fn contains_all<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for key in keys {
            if !self.selected.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Keep only keys accepted by `keep`. Returns whether anything was dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> bool {
        let before = self.selected.len();
        self.selected.retain(|k| keep(k));
        self.selected.len() != before
    }
}

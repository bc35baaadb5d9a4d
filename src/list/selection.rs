use std::collections::HashSet;
use std::hash::Hash;

/// Keys picked for a bulk action. Only ever holds keys of visible rows;
/// [`super::ListController`] clears it whenever the visible rows change.
#[derive(Debug, Clone)]
pub struct SelectionSet<K> {
    keys: HashSet<K>,
}

impl<K> Default for SelectionSet<K> {
    fn default() -> Self {
        SelectionSet { keys: HashSet::new() }
    }
}

impl<K: Clone + Eq + Hash> SelectionSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one key. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// "Select all" checkbox: a second click when every visible row is
    /// already selected deselects everything.
    pub fn select_all_visible(&mut self, visible: &[K]) {
        if self.all_selected(visible) {
            self.keys.clear();
        } else {
            self.keys.extend(visible.iter().cloned());
        }
    }

    /// True when `visible` is non-empty and every key in it is selected.
    pub fn all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|k| self.keys.contains(k))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Drop anything not in `visible`.
    pub fn retain_visible(&mut self, visible: &[K]) {
        self.keys.retain(|k| visible.contains(k));
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Selected keys in `visible` order, for issuing bulk requests.
    pub fn selected_in(&self, visible: &[K]) -> Vec<K> {
        visible.iter().filter(|k| self.keys.contains(k)).cloned().collect()
    }
}

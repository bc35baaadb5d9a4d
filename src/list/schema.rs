use std::fmt;
use std::hash::Hash;

use super::field::{FieldKind, FieldValue};

/// A row that can be shown in an admin list.
///
/// Records are addressed by a consumer-chosen key (`user_id`, `log_id`, ...)
/// and expose their columns by name so one filter/sort engine serves every
/// page.
pub trait ListRecord {
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Read a named column. `None` when the record has no such value.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// A named column with its declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub key: String,
    pub kind: FieldKind,
}

/// Declared shape of one list page: which columns free-text search looks
/// at, which columns accept categorical filters, and which are sortable.
#[derive(Debug, Clone, Default)]
pub struct ListSchema {
    searchable: Vec<String>,
    filterable: Vec<FieldDef>,
    sortable: Vec<FieldDef>,
}

impl ListSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, key: impl Into<String>, kind: FieldKind) -> Self {
        self.filterable.push(FieldDef { key: key.into(), kind });
        self
    }

    pub fn sort(mut self, key: impl Into<String>, kind: FieldKind) -> Self {
        self.sortable.push(FieldDef { key: key.into(), kind });
        self
    }

    pub fn searchable(&self) -> &[String] {
        &self.searchable
    }

    pub fn filterable(&self) -> &[FieldDef] {
        &self.filterable
    }

    pub fn sortable(&self) -> &[FieldDef] {
        &self.sortable
    }

    pub fn filter_kind(&self, key: &str) -> Option<FieldKind> {
        self.filterable.iter().find(|f| f.key == key).map(|f| f.kind)
    }

    pub fn sort_kind(&self, key: &str) -> Option<FieldKind> {
        self.sortable.iter().find(|f| f.key == key).map(|f| f.kind)
    }
}

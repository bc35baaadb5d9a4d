use super::derive::{DerivedView, derive};
use super::query::{QueryState, SortDir};
use super::schema::{ListRecord, ListSchema};
use super::selection::SelectionSet;

/// State behind one admin list page: the loaded records, what the user has
/// asked to see, and which visible rows are ticked for a bulk action.
///
/// Any change that alters the set or order of visible rows (search, filter,
/// sort, page, page size, reload, in-place edit) clears the selection, so a
/// bulk action never targets a row the user can no longer see.
#[derive(Debug)]
pub struct ListController<R: ListRecord> {
    records: Vec<R>,
    schema: ListSchema,
    query: QueryState,
    selection: SelectionSet<R::Key>,
}

impl<R: ListRecord> ListController<R> {
    pub fn new(schema: ListSchema, page_size: usize) -> Self {
        ListController {
            records: Vec::new(),
            schema,
            query: QueryState::new(page_size),
            selection: SelectionSet::new(),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn schema(&self) -> &ListSchema {
        &self.schema
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn selection(&self) -> &SelectionSet<R::Key> {
        &self.selection
    }

    pub fn view(&self) -> DerivedView<'_, R> {
        derive(&self.records, &self.schema, &self.query)
    }

    pub fn visible_keys(&self) -> Vec<R::Key> {
        self.view().keys()
    }

    /// Run a state change, re-clamp the page, and drop the selection if
    /// the visible rows moved.
    fn update(&mut self, change: impl FnOnce(&mut Self)) {
        let before = self.visible_keys();
        change(self);
        let total = self.view().total_filtered;
        self.query.clamp_page(total);
        if self.visible_keys() != before {
            self.selection.clear();
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.update(|c| c.query.set_search_text(text));
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.update(|c| c.query.set_filter(key, value));
    }

    pub fn clear_filters(&mut self) {
        self.update(|c| c.query.clear_filters());
    }

    pub fn set_sort(&mut self, column: impl Into<String>, dir: SortDir) {
        let column = column.into();
        self.update(|c| c.query.set_sort(column, dir));
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.update(|c| c.query.toggle_sort(column));
    }

    pub fn set_page(&mut self, page: usize) {
        self.update(|c| c.query.set_page(page));
    }

    pub fn next_page(&mut self) {
        let page = self.query.page() + 1;
        self.set_page(page);
    }

    pub fn previous_page(&mut self) {
        let page = self.query.page().saturating_sub(1);
        self.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.update(|c| c.query.set_page_size(page_size));
    }

    pub fn set_page_size_keep_page(&mut self, page_size: usize) {
        self.update(|c| {
            let total = c.view().total_filtered;
            c.query.set_page_size_keep_page(page_size, total);
        });
    }

    /// Swap in a freshly fetched collection.
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.update(|c| c.records = records);
    }

    /// Targeted optimistic edit of one record, e.g. flipping `is_active`.
    /// Returns false when no record has that key.
    pub fn update_record(&mut self, key: &R::Key, edit: impl FnOnce(&mut R)) -> bool {
        let Some(index) = self.records.iter().position(|r| &r.key() == key) else {
            log::debug!("No record with key {key:?} to update");
            return false;
        };
        self.update(|c| edit(&mut c.records[index]));
        true
    }

    /// Remove a record locally after a successful delete.
    pub fn remove_record(&mut self, key: &R::Key) -> Option<R> {
        let index = self.records.iter().position(|r| &r.key() == key)?;
        let mut removed = None;
        self.update(|c| removed = Some(c.records.remove(index)));
        removed
    }

    /// Toggle one row. Keys that are not on the current page are ignored.
    pub fn toggle_selection(&mut self, key: R::Key) -> bool {
        if !self.visible_keys().contains(&key) {
            log::debug!("Ignoring selection of non-visible key {key:?}");
            return false;
        }
        self.selection.toggle(key)
    }

    pub fn select_all_visible(&mut self) {
        let visible = self.visible_keys();
        self.selection.select_all_visible(&visible);
    }

    pub fn all_visible_selected(&self) -> bool {
        self.selection.all_selected(&self.visible_keys())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected keys in display order.
    pub fn selected_keys(&self) -> Vec<R::Key> {
        self.selection.selected_in(&self.visible_keys())
    }
}

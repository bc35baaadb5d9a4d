//! Pure filter → sort → paginate pipeline.
//!
//! Nothing here mutates the source slice; rows are handed back as borrowed
//! references in display order.

use super::field::SortKey;
use super::query::{QueryState, SortDir, SortSpec, total_pages};
use super::schema::{ListRecord, ListSchema};

/// The rows a list page should render plus the numbers for its pager.
#[derive(Debug)]
pub struct DerivedView<'a, R> {
    pub rows: Vec<&'a R>,
    pub total_filtered: usize,
    pub total_pages: usize,
    /// Page actually shown, after clamping.
    pub page: usize,
    pub page_size: usize,
}

impl<R: ListRecord> DerivedView<'_, R> {
    pub fn keys(&self) -> Vec<R::Key> {
        self.rows.iter().map(|r| r.key()).collect()
    }
}

impl<R> DerivedView<'_, R> {
    /// 1-based inclusive range for "Showing X to Y of Z". `None` when empty.
    pub fn showing_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.rows.len() - 1))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Keep records matching the search text and every active filter.
///
/// Search is a case-insensitive substring test over the schema's searchable
/// columns. Filters on columns the schema does not declare are ignored.
pub fn filter_records<'a, R: ListRecord>(
    records: &'a [R],
    schema: &ListSchema,
    query: &QueryState,
) -> Vec<&'a R> {
    let needle = query.search_text().to_lowercase();
    let filters: Vec<_> = query
        .active_filters()
        .filter_map(|(key, value)| match schema.filter_kind(key) {
            Some(kind) => Some((key, kind, value)),
            None => {
                log::debug!("Ignoring filter on undeclared field '{key}'");
                None
            }
        })
        .collect();

    records
        .iter()
        .filter(|record| {
            let search_ok = needle.is_empty()
                || schema.searchable().iter().any(|key| {
                    record
                        .field(key)
                        .is_some_and(|v| v.contains_lower(&needle))
                });
            search_ok
                && filters.iter().all(|(key, kind, wanted)| {
                    record
                        .field(key)
                        .is_some_and(|v| v.matches_filter(*kind, wanted))
                })
        })
        .collect()
}

/// Stable sort on the requested column. Unsorted specs and undeclared columns
/// leave the input order untouched.
pub fn sort_records<R: ListRecord>(rows: &mut Vec<&R>, schema: &ListSchema, sort: &SortSpec) {
    if sort.is_unsorted() {
        return;
    }
    let Some(kind) = schema.sort_kind(&sort.column) else {
        log::debug!("Ignoring sort on undeclared field '{}'", sort.column);
        return;
    };

    let mut keyed: Vec<(SortKey, &R)> = rows
        .drain(..)
        .map(|r| (SortKey::from_value(r.field(&sort.column), kind), r))
        .collect();
    // slice::sort_by is stable; flipping the comparator keeps ties in input order.
    match sort.dir {
        SortDir::Asc => keyed.sort_by(|a, b| a.0.compare(&b.0)),
        SortDir::Desc => keyed.sort_by(|a, b| b.0.compare(&a.0)),
    }
    rows.extend(keyed.into_iter().map(|(_, r)| r));
}

/// Slice out one page, clamping `page` into range first.
/// Returns (rows, page actually used, total pages).
pub fn paginate<'a, R>(rows: &[&'a R], page: usize, page_size: usize) -> (Vec<&'a R>, usize, usize) {
    let page_size = page_size.max(1);
    let pages = total_pages(rows.len(), page_size);
    let page = page.clamp(1, pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(rows.len());
    let slice = if start < rows.len() { rows[start..end].to_vec() } else { Vec::new() };
    (slice, page, pages)
}

/// Full pipeline for one render.
pub fn derive<'a, R: ListRecord>(
    records: &'a [R],
    schema: &ListSchema,
    query: &QueryState,
) -> DerivedView<'a, R> {
    let mut rows = filter_records(records, schema, query);
    sort_records(&mut rows, schema, query.sort());
    let total_filtered = rows.len();
    let (rows, page, total_pages) = paginate(&rows, query.page(), query.page_size());
    DerivedView {
        rows,
        total_filtered,
        total_pages,
        page,
        page_size: query.page_size(),
    }
}

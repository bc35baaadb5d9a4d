use std::collections::BTreeMap;

/// Filter value meaning "no constraint". An empty string means the same.
pub const ALL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_param(dir: Option<&str>) -> Self {
        if dir.is_some_and(|d| d.eq_ignore_ascii_case("desc")) {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Sort column and direction. An empty column means "source order".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, dir: SortDir) -> Self {
        SortSpec { column: column.into(), dir }
    }

    pub fn from_params(sort: Option<&str>, dir: Option<&str>) -> Self {
        SortSpec {
            column: sort.unwrap_or("").to_string(),
            dir: SortDir::from_param(dir),
        }
    }

    pub fn is_unsorted(&self) -> bool {
        self.column.is_empty()
    }
}

fn is_unconstrained(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

pub(crate) fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// What the user has dialled in on a list view.
///
/// Every setter except [`QueryState::set_page`] sends the user back to the
/// first page. `page` and `page_size` are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    filters: BTreeMap<String, String>,
    sort: SortSpec,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        QueryState {
            search_text: String::new(),
            filters: BTreeMap::new(),
            sort: SortSpec::default(),
            page: 1,
            page_size: coerce_page_size(page_size),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current value for a filter key, `ALL` when unset.
    pub fn filter(&self, key: &str) -> &str {
        self.filters.get(key).map(String::as_str).unwrap_or(ALL)
    }

    /// Filters that actually constrain the result.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, v)| !is_unconstrained(v))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    /// Setting a key to `ALL` or "" removes the constraint.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if is_unconstrained(&value) {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self.page = 1;
    }

    /// "Clear filters" button: drops the search text as well.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search_text.clear();
        self.page = 1;
    }

    pub fn set_sort(&mut self, column: impl Into<String>, dir: SortDir) {
        self.sort = SortSpec::new(column, dir);
        self.page = 1;
    }

    /// Header-click behaviour: same column flips direction, a new column
    /// starts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        let dir = if self.sort.column == column {
            self.sort.dir.toggled()
        } else {
            SortDir::Asc
        };
        self.set_sort(column, dir);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = coerce_page_size(page_size);
        self.page = 1;
    }

    /// Change the page size but stay on the current page when it still
    /// exists for `total_filtered` rows.
    pub fn set_page_size_keep_page(&mut self, page_size: usize, total_filtered: usize) {
        self.page_size = coerce_page_size(page_size);
        if self.page > total_pages(total_filtered, self.page_size) {
            self.page = 1;
        }
    }

    /// Pull `page` back into `[1, total_pages]`. Returns the clamped page.
    pub fn clamp_page(&mut self, total_filtered: usize) -> usize {
        self.page = self.page.clamp(1, total_pages(total_filtered, self.page_size));
        self.page
    }

    /// Query-string form for endpoints that paginate server-side.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.search_text.is_empty() {
            pairs.push(("search".to_string(), self.search_text.clone()));
        }
        for (key, value) in self.active_filters() {
            pairs.push((key.to_string(), value.to_string()));
        }
        if !self.sort.is_unsorted() {
            pairs.push(("sort".to_string(), self.sort.column.clone()));
            pairs.push(("order".to_string(), self.sort.dir.as_str().to_string()));
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.page_size.to_string()));
        pairs
    }
}

fn coerce_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        log::warn!("Page size 0 is invalid, using 1");
        1
    } else {
        page_size
    }
}

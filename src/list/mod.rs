//! Client-side list state shared by every admin table: free-text search,
//! categorical filters, stable sorting, pagination and bulk selection.

pub mod controller;
pub mod derive;
pub mod field;
pub mod query;
pub mod record;
pub mod schema;
pub mod selection;

pub use controller::ListController;
pub use derive::{DerivedView, derive, filter_records, paginate, sort_records};
pub use field::{FieldKind, FieldValue};
pub use query::{ALL, DEFAULT_PAGE_SIZE, QueryState, SortDir, SortSpec};
pub use record::Record;
pub use schema::{FieldDef, ListRecord, ListSchema};
pub use selection::SelectionSet;

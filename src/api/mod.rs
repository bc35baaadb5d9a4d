pub mod client;
pub mod resources;

pub use client::{ApiClient, ApiResponse, Pagination};
pub use resources::{ListPage, Resource};

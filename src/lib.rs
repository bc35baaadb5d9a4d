//! Client-side state for the LessonHub admin dashboard.
//!
//! Two reusable pieces sit under every admin page: [`list::ListController`]
//! (search, filter, sort, paginate and bulk-select over a loaded
//! collection) and [`notifications::NotificationFeed`] (polled notifications
//! with optimistic read tracking). Both talk to the REST backend through
//! [`api::ApiClient`], which takes its bearer token from an injected
//! [`auth::AuthContext`].

pub mod api;
pub mod auth;
pub mod badge;
pub mod config;
pub mod errors;
pub mod format;
pub mod list;
pub mod models;
pub mod notifications;

pub use api::{ApiClient, Resource};
pub use auth::AuthContext;
pub use config::DashboardConfig;
pub use errors::ApiError;
pub use list::{ListController, QueryState};
pub use notifications::NotificationFeed;

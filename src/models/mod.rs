//! Typed rows for the admin list pages. Each module declares the columns
//! its page searches, filters and sorts on.

pub mod activity_log;
pub mod dashboard;
pub mod instructor;
pub mod lesson_module;
pub mod payment;
pub mod user;

pub use activity_log::ActivityLog;
pub use dashboard::DashboardStats;
pub use instructor::Instructor;
pub use lesson_module::LessonModule;
pub use payment::Payment;
pub use user::AdminUser;

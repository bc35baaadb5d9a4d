use serde::{Deserialize, Serialize};

/// Headline numbers for the admin landing page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_instructors: u64,
    pub total_modules: u64,
    pub total_lessons: u64,
    pub total_revenue: f64,
    pub pending_payments: u64,
    pub unread_notifications: u64,
}

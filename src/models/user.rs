use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{de_opt_timestamp, de_timestamp};
use crate::list::{FieldKind, FieldValue, ListRecord, ListSchema};

/// Row of the admin users table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AdminUser {
    #[serde(alias = "id")]
    pub user_id: i64,
    pub name: String,
    pub email: String,
    /// `student`, `instructor` or `admin`.
    pub role: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Search by name/email, filter by role and status.
pub fn schema() -> ListSchema {
    ListSchema::new()
        .search(["name", "email"])
        .filter("role", FieldKind::Text)
        .filter("is_active", FieldKind::Bool)
        .sort("name", FieldKind::Text)
        .sort("email", FieldKind::Text)
        .sort("role", FieldKind::Text)
        .sort("created_at", FieldKind::Date)
        .sort("last_login", FieldKind::Date)
}

impl AdminUser {
    pub fn status(&self) -> &'static str {
        if self.is_active { "active" } else { "inactive" }
    }
}

impl ListRecord for AdminUser {
    type Key = i64;

    fn key(&self) -> i64 {
        self.user_id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "user_id" => Some(self.user_id.into()),
            "name" => Some(self.name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "role" => Some(self.role.as_str().into()),
            "is_active" => Some(self.is_active.into()),
            "status" => Some(self.status().into()),
            "created_at" => Some(self.created_at.into()),
            "last_login" => self.last_login.map(Into::into),
            _ => None,
        }
    }
}

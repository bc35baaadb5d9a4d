use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::de_timestamp;
use crate::list::{FieldKind, FieldValue, ListRecord, ListSchema};

/// Audit trail entry shown on the activity log page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ActivityLog {
    #[serde(alias = "id")]
    pub log_id: i64,
    pub user_name: String,
    pub action: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

pub fn schema() -> ListSchema {
    ListSchema::new()
        .search(["user_name", "action", "description"])
        .filter("action", FieldKind::Text)
        .filter("entity_type", FieldKind::Text)
        .filter("created_at", FieldKind::Date)
        .sort("created_at", FieldKind::Date)
        .sort("user_name", FieldKind::Text)
        .sort("action", FieldKind::Text)
}

impl ListRecord for ActivityLog {
    type Key = i64;

    fn key(&self) -> i64 {
        self.log_id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "log_id" => Some(self.log_id.into()),
            "user_name" => Some(self.user_name.as_str().into()),
            "action" => Some(self.action.as_str().into()),
            "entity_type" => Some(self.entity_type.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "ip_address" => self.ip_address.as_deref().map(Into::into),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

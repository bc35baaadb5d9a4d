use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::de_timestamp;
use crate::list::{FieldKind, FieldValue, ListRecord, ListSchema};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Instructor {
    #[serde(alias = "id")]
    pub instructor_id: i64,
    pub name: String,
    pub email: String,
    pub instrument: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

pub fn schema() -> ListSchema {
    ListSchema::new()
        .search(["name", "email", "instrument"])
        .filter("instrument", FieldKind::Text)
        .filter("is_active", FieldKind::Bool)
        .sort("name", FieldKind::Text)
        .sort("rating", FieldKind::Number)
        .sort("student_count", FieldKind::Number)
        .sort("created_at", FieldKind::Date)
}

impl ListRecord for Instructor {
    type Key = i64;

    fn key(&self) -> i64 {
        self.instructor_id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "instructor_id" => Some(self.instructor_id.into()),
            "name" => Some(self.name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "instrument" => Some(self.instrument.as_str().into()),
            "rating" => self.rating.map(Into::into),
            "student_count" => Some(i64::from(self.student_count).into()),
            "is_active" => Some(self.is_active.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

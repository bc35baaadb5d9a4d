use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::de_timestamp;
use crate::list::{FieldKind, FieldValue, ListRecord, ListSchema};

/// A course module grouping lessons and quizzes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LessonModule {
    #[serde(alias = "id")]
    pub module_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instrument: String,
    /// `beginner`, `intermediate` or `advanced`.
    pub level: String,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub is_published: bool,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

pub fn schema() -> ListSchema {
    ListSchema::new()
        .search(["title", "description"])
        .filter("instrument", FieldKind::Text)
        .filter("level", FieldKind::Text)
        .filter("is_published", FieldKind::Bool)
        .sort("title", FieldKind::Text)
        .sort("level", FieldKind::Text)
        .sort("lesson_count", FieldKind::Number)
        .sort("created_at", FieldKind::Date)
}

impl ListRecord for LessonModule {
    type Key = i64;

    fn key(&self) -> i64 {
        self.module_id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "module_id" => Some(self.module_id.into()),
            "title" => Some(self.title.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "instrument" => Some(self.instrument.as_str().into()),
            "level" => Some(self.level.as_str().into()),
            "lesson_count" => Some(i64::from(self.lesson_count).into()),
            "is_published" => Some(self.is_published.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

use std::sync::Arc;

use serde_json::{Map, Value};

use super::field::FieldValue;
use super::schema::ListRecord;

/// Untyped JSON row for endpoints without a dedicated model.
///
/// The key column is named by the caller (`id`, `log_id`, ...). Key values
/// are compared as their text form, so `7` and `"7"` address the same row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key_field: Arc<str>,
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(key_field: impl Into<Arc<str>>, fields: Map<String, Value>) -> Self {
        Record { key_field: key_field.into(), fields }
    }

    /// Wrap every object in a JSON array; non-objects are skipped.
    pub fn from_array(key_field: &str, values: Vec<Value>) -> Vec<Record> {
        let key_field: Arc<str> = Arc::from(key_field);
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(fields) => Some(Record { key_field: key_field.clone(), fields }),
                other => {
                    log::warn!("Skipping non-object list entry: {other}");
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl ListRecord for Record {
    type Key = String;

    fn key(&self) -> String {
        match self.fields.get(self.key_field.as_ref()) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match self.fields.get(name)? {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::field::FieldKind;
    use crate::list::{ListSchema, QueryState, derive};
    use serde_json::json;

    fn sample() -> Vec<Record> {
        let raw = json!([
            {"id": 1, "name": "Alice", "role": "student"},
            {"id": 2, "name": "Bob", "role": "admin"},
            {"id": 3, "name": "alice2", "role": "student"},
            "garbage"
        ]);
        let Value::Array(values) = raw else { unreachable!() };
        Record::from_array("id", values)
    }

    #[test]
    fn skips_non_objects() {
        assert_eq!(sample().len(), 3);
    }

    #[test]
    fn numeric_keys_read_as_text() {
        let records = sample();
        assert_eq!(records[1].key(), "2");
    }

    #[test]
    fn dynamic_records_filter_like_typed_ones() {
        let records = sample();
        let schema = ListSchema::new().search(["name"]).filter("role", FieldKind::Text);
        let mut q = QueryState::new(10);
        q.set_search_text("ali");
        q.set_filter("role", "student");
        let view = derive(&records, &schema, &q);
        assert_eq!(view.keys(), vec!["1".to_string(), "3".to_string()]);
    }

    #[test]
    fn set_overwrites_field() {
        let mut r = sample().remove(0);
        r.set("is_active", false);
        assert_eq!(r.field("is_active"), Some(FieldValue::Bool(false)));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::de_timestamp;
use crate::list::{FieldKind, FieldValue, ListRecord, ListSchema};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Payment {
    #[serde(alias = "id")]
    pub payment_id: i64,
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// `pending`, `completed`, `failed` or `refunded`.
    pub status: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

pub fn schema() -> ListSchema {
    ListSchema::new()
        .search(["user_name", "user_email", "payment_id"])
        .filter("status", FieldKind::Text)
        .filter("payment_method", FieldKind::Text)
        .sort("amount", FieldKind::Number)
        .sort("user_name", FieldKind::Text)
        .sort("created_at", FieldKind::Date)
}

/// Sum of completed payments, for the revenue card above the table.
pub fn completed_total(payments: &[Payment]) -> f64 {
    payments
        .iter()
        .filter(|p| p.status.eq_ignore_ascii_case("completed"))
        .map(|p| p.amount)
        .sum()
}

impl ListRecord for Payment {
    type Key = i64;

    fn key(&self) -> i64 {
        self.payment_id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "payment_id" => Some(self.payment_id.into()),
            "user_name" => Some(self.user_name.as_str().into()),
            "user_email" => Some(self.user_email.as_str().into()),
            "amount" => Some(self.amount.into()),
            "currency" => Some(self.currency.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "payment_method" => Some(self.payment_method.as_str().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

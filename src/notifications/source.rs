use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::types::{FeedAudience, Notification, NotificationSnapshot};
use crate::api::ApiClient;
use crate::errors::ApiError;

/// Backend the feed polls and reports reads to.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn fetch(&self) -> Result<NotificationSnapshot, ApiError>;
    async fn mark_read(&self, id: i64) -> Result<(), ApiError>;
    async fn mark_all_read(&self) -> Result<(), ApiError>;
}

/// REST-backed source.
#[derive(Debug, Clone)]
pub struct HttpNotificationSource {
    client: ApiClient,
    audience: FeedAudience,
}

impl HttpNotificationSource {
    pub fn new(client: ApiClient, audience: FeedAudience) -> Self {
        HttpNotificationSource { client, audience }
    }

    pub fn audience(&self) -> FeedAudience {
        self.audience
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn fetch(&self) -> Result<NotificationSnapshot, ApiError> {
        let path = self.audience.path();
        let response = self.client.get_raw(path, &[]).await?;
        // Older endpoints return the bare list.
        let decoded = match response.data {
            Value::Array(_) => serde_json::from_value::<Vec<Notification>>(response.data).map(|notifications| {
                NotificationSnapshot { notifications, unread_count: None }
            }),
            data => serde_json::from_value(data),
        };
        decoded.map_err(|e| ApiError::from(e).logged(path))
    }

    async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/notifications/{id}/read");
        self.client.send_ack::<Value>(Method::PUT, &path, None).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.client
            .send_ack::<Value>(Method::PUT, "/api/notifications/read-all", None)
            .await
    }
}

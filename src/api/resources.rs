//! Admin endpoints behind each list page.

use std::fmt::Display;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::client::{ApiClient, Pagination};
use crate::errors::ApiError;
use crate::list::QueryState;
use crate::list::query::total_pages;
use crate::models::dashboard::DashboardStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Instructors,
    Modules,
    Payments,
    ActivityLogs,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Users => "/api/admin/users",
            Resource::Instructors => "/api/admin/instructors",
            Resource::Modules => "/api/admin/modules",
            Resource::Payments => "/api/admin/payments",
            Resource::ActivityLogs => "/api/admin/activity-logs",
        }
    }

    /// Field that wraps the rows when the endpoint answers with an object.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Instructors => "instructors",
            Resource::Modules => "modules",
            Resource::Payments => "payments",
            Resource::ActivityLogs => "logs",
        }
    }

    fn item_path(&self, id: impl Display) -> String {
        format!("{}/{}", self.path(), id)
    }
}

/// One page of a server-paginated list.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// List endpoints answer either with a bare array or with an object
/// wrapping one (`{"users": [...], "roles": [...]}`). A wrapped payload is
/// read from `key`; without that field it must hold exactly one array.
fn extract_items<T: DeserializeOwned>(data: Value, key: &str) -> Result<Vec<T>, ApiError> {
    let items = match data {
        Value::Array(_) => data,
        Value::Object(mut map) => match map.remove(key) {
            Some(items @ Value::Array(_)) => items,
            _ => {
                let mut arrays = map.into_iter().filter(|(_, v)| v.is_array());
                match (arrays.next(), arrays.next()) {
                    (Some((_, items)), None) => items,
                    (None, _) => return Err(ApiError::Malformed(format!("no '{key}' list in response data"))),
                    (Some(_), Some(_)) => {
                        return Err(ApiError::Malformed(format!(
                            "no '{key}' list and several candidates in response data"
                        )));
                    }
                }
            }
        },
        Value::Null => return Ok(Vec::new()),
        other => return Err(ApiError::Malformed(format!("expected list, got {other}"))),
    };
    Ok(serde_json::from_value(items)?)
}

/// Slice an unpaged collection the same way [`crate::list::paginate`] does.
fn local_page<T>(items: Vec<T>, page: usize, limit: usize) -> ListPage<T> {
    let limit = limit.max(1);
    let total = items.len();
    let pages = total_pages(total, limit);
    let page = page.clamp(1, pages);
    let items = items.into_iter().skip((page - 1) * limit).take(limit).collect();
    ListPage {
        items,
        pagination: Pagination { page, limit, total, pages },
    }
}

impl ApiClient {
    /// Whole collection, for pages that filter and paginate client-side.
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        let response = self.get_raw(resource.path(), &[]).await?;
        extract_items(response.data, resource.collection_key()).map_err(|e| e.logged(resource.path()))
    }

    /// One page, with search/filter/sort/pagination applied by the backend.
    /// When the backend omits `pagination` it sent the whole collection, so
    /// the requested page is cut out locally with the usual clamp rule.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &QueryState,
    ) -> Result<ListPage<T>, ApiError> {
        let response = self.get_raw(resource.path(), &query.to_query_pairs()).await?;
        let items: Vec<T> = extract_items(response.data, resource.collection_key())
            .map_err(|e| e.logged(resource.path()))?;
        Ok(match response.pagination {
            Some(pagination) => ListPage { items, pagination },
            None => {
                log::debug!("{} sent no pagination, paging locally", resource.path());
                local_page(items, query.page(), query.page_size())
            }
        })
    }

    pub async fn create<T, B>(&self, resource: Resource, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::POST, resource.path(), Some(body)).await?;
        Ok(response.data)
    }

    pub async fn update<T, B>(&self, resource: Resource, id: impl Display, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::PUT, &resource.item_path(id), Some(body)).await?;
        Ok(response.data)
    }

    pub async fn delete(&self, resource: Resource, id: impl Display) -> Result<(), ApiError> {
        self.send_ack::<Value>(Method::DELETE, &resource.item_path(id), None).await
    }

    /// Backend half of an optimistic activate/deactivate toggle.
    pub async fn set_active(&self, resource: Resource, id: impl Display, active: bool) -> Result<(), ApiError> {
        let path = format!("{}/status", resource.item_path(id));
        self.send_ack(Method::PUT, &path, Some(&json!({ "is_active": active }))).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let response = self.get("/api/admin/dashboard/stats", &[]).await?;
        Ok(response.data)
    }
}

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::DashboardConfig;
use crate::format::de_timestamp;

/// One entry in the bell dropdown.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub notification_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_read: bool,
}

/// Some endpoints send `is_read` as 0/1.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}

/// Result of one notification poll.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotificationSnapshot {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Count as reported by the backend. Informational only; the feed
    /// recounts from `notifications`.
    #[serde(default, alias = "unreadCount")]
    pub unread_count: Option<usize>,
}

/// Which backend feed to poll. Admin feeds poll more often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedAudience {
    Admin,
    User,
}

impl FeedAudience {
    pub fn path(&self) -> &'static str {
        match self {
            FeedAudience::Admin => "/api/notifications/admin/system",
            FeedAudience::User => "/api/notifications",
        }
    }

    pub fn poll_interval(&self, config: &DashboardConfig) -> Duration {
        match self {
            FeedAudience::Admin => config.admin_poll_interval,
            FeedAudience::User => config.user_poll_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Observable feed state. `unread_count` always equals the number of
/// entries in `notifications` with `is_read == false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    notifications: Vec<Notification>,
    unread_count: usize,
    is_loading: bool,
    error: Option<String>,
    loaded: bool,
    pub(crate) last_applied_seq: u64,
    /// Bumped each time a fetch result is applied.
    pub(crate) generation: u64,
}

impl FeedState {
    /// Newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the most recent applied failure, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> FeedStatus {
        if self.is_loading {
            FeedStatus::Loading
        } else if self.error.is_some() {
            FeedStatus::Errored
        } else if self.loaded {
            FeedStatus::Loaded
        } else {
            FeedStatus::Idle
        }
    }

    pub(crate) fn set_loading(&mut self, loading: bool) -> bool {
        let changed = self.is_loading != loading;
        self.is_loading = loading;
        changed
    }

    fn recount(&mut self) {
        self.unread_count = self.notifications.iter().filter(|n| !n.is_read).count();
    }

    /// Replace everything with a fresh poll result.
    pub(crate) fn apply_snapshot(&mut self, snapshot: NotificationSnapshot) {
        let mut notifications = snapshot.notifications;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.notifications = notifications;
        self.recount();
        if let Some(reported) = snapshot.unread_count.filter(|r| *r != self.unread_count) {
            log::debug!(
                "Backend reported {reported} unread, list holds {}",
                self.unread_count
            );
        }
        self.error = None;
        self.loaded = true;
        self.generation += 1;
    }

    /// Keep the previous list; just record why the refresh failed.
    pub(crate) fn apply_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Returns true if the entry existed and was unread.
    pub(crate) fn mark_read_local(&mut self, id: i64) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.is_read => {
                n.is_read = true;
                self.unread_count = self.unread_count.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Returns the ids that flipped.
    pub(crate) fn mark_all_read_local(&mut self) -> Vec<i64> {
        let flipped: Vec<i64> = self
            .notifications
            .iter_mut()
            .filter(|n| !n.is_read)
            .map(|n| {
                n.is_read = true;
                n.id
            })
            .collect();
        self.unread_count = 0;
        flipped
    }

    pub(crate) fn mark_unread_local(&mut self, ids: &[i64]) {
        for n in self.notifications.iter_mut().filter(|n| ids.contains(&n.id)) {
            n.is_read = false;
        }
        self.recount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn note(id: i64, created_at: &str, is_read: bool) -> Notification {
        serde_json::from_value(json!({
            "id": id, "type": "payment", "title": format!("n{id}"),
            "created_at": created_at, "is_read": is_read
        }))
        .unwrap()
    }

    fn loaded(notes: Vec<Notification>) -> FeedState {
        let mut s = FeedState::default();
        s.apply_snapshot(NotificationSnapshot { notifications: notes, unread_count: None });
        s
    }

    #[test]
    fn decodes_numeric_flag_and_type() {
        let n: Notification = serde_json::from_value(json!({
            "id": 9, "notification_id": "ntf_9", "type": "system", "title": "Backup done",
            "message": "ok", "created_at": "2026-10-18 07:00:00", "is_read": 1
        }))
        .unwrap();
        assert!(n.is_read);
        assert_eq!(n.kind, "system");
        assert_eq!(n.notification_id.as_deref(), Some("ntf_9"));
    }

    #[test]
    fn snapshot_accepts_camel_case_count() {
        let s: NotificationSnapshot =
            serde_json::from_value(json!({"notifications": [], "unreadCount": 4})).unwrap();
        assert_eq!(s.unread_count, Some(4));
    }

    #[test]
    fn snapshot_is_sorted_newest_first_and_recounted() {
        let s = loaded(vec![
            note(1, "2026-10-01T00:00:00Z", false),
            note(2, "2026-10-03T00:00:00Z", true),
            note(3, "2026-10-02T00:00:00Z", false),
        ]);
        let ids: Vec<i64> = s.notifications().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(s.unread_count(), 2);
        assert_eq!(s.status(), FeedStatus::Loaded);
    }

    #[test]
    fn mark_one_then_all() {
        let mut s = loaded(vec![
            note(1, "2026-10-01T00:00:00Z", false),
            note(2, "2026-10-02T00:00:00Z", false),
        ]);
        assert!(s.mark_read_local(1));
        assert_eq!(s.unread_count(), 1);
        assert!(!s.mark_read_local(1));
        assert!(!s.mark_read_local(42));
        assert_eq!(s.unread_count(), 1);

        assert_eq!(s.mark_all_read_local(), vec![2]);
        assert_eq!(s.unread_count(), 0);

        s.mark_unread_local(&[2]);
        assert_eq!(s.unread_count(), 1);
    }

    #[test]
    fn error_keeps_previous_list() {
        let mut s = loaded(vec![note(1, "2026-10-01T00:00:00Z", false)]);
        s.apply_error("Network error".to_string());
        assert_eq!(s.status(), FeedStatus::Errored);
        assert_eq!(s.notifications().len(), 1);
        assert_eq!(s.unread_count(), 1);
    }

    #[test]
    fn fresh_state_is_idle() {
        assert_eq!(FeedState::default().status(), FeedStatus::Idle);
    }
}

pub mod feed;
pub mod source;
pub mod types;

pub use feed::{FetchOutcome, NotificationFeed};
pub use source::{HttpNotificationSource, NotificationSource};
pub use types::{FeedAudience, FeedState, FeedStatus, Notification, NotificationSnapshot};

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::DashboardConfig;

/// Build and start a REST-backed feed polling at the audience's configured
/// interval.
pub fn start_feed(client: ApiClient, audience: FeedAudience, config: &DashboardConfig) -> NotificationFeed {
    let feed = NotificationFeed::new(Arc::new(HttpNotificationSource::new(client, audience)));
    feed.start(audience.poll_interval(config));
    feed
}

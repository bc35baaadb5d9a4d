use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthContext, DEFAULT_TOKEN_KEY, FileTokenStore};
use crate::list::{DEFAULT_PAGE_SIZE, ListController, ListRecord, ListSchema};

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TOKEN_FILE: &str = "data/session.json";
const DEFAULT_ADMIN_POLL_SECS: u64 = 30;
const DEFAULT_USER_POLL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the dashboard client.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub token_key: String,
    pub token_file: PathBuf,
    pub admin_poll_interval: Duration,
    pub user_poll_interval: Duration,
    pub request_timeout: Duration,
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            api_base_url: DEFAULT_API_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            admin_poll_interval: Duration::from_secs(DEFAULT_ADMIN_POLL_SECS),
            user_poll_interval: Duration::from_secs(DEFAULT_USER_POLL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DashboardConfig {
    /// Read `DASHBOARD_*` variables, loading `.env` first if present.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Bad values fall back to defaults
    /// with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = DashboardConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = non_empty("DASHBOARD_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let token_key = non_empty("DASHBOARD_TOKEN_KEY").unwrap_or(defaults.token_key);
        let token_file = non_empty("DASHBOARD_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.token_file);

        let secs = |key: &str, default: u64| {
            let value = parsed(&lookup, key, default);
            if value == 0 {
                log::warn!("{key} must be positive, using {default}");
                Duration::from_secs(default)
            } else {
                Duration::from_secs(value)
            }
        };

        let page_size = match parsed(&lookup, "DASHBOARD_PAGE_SIZE", DEFAULT_PAGE_SIZE) {
            0 => {
                log::warn!("DASHBOARD_PAGE_SIZE must be positive, using {DEFAULT_PAGE_SIZE}");
                DEFAULT_PAGE_SIZE
            }
            n => n,
        };

        DashboardConfig {
            api_base_url,
            token_key,
            token_file,
            admin_poll_interval: secs("DASHBOARD_ADMIN_POLL_SECS", DEFAULT_ADMIN_POLL_SECS),
            user_poll_interval: secs("DASHBOARD_USER_POLL_SECS", DEFAULT_USER_POLL_SECS),
            request_timeout: secs("DASHBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            page_size,
        }
    }

    /// Session backed by the configured token file.
    pub fn auth_context(&self) -> AuthContext {
        AuthContext::new(Arc::new(FileTokenStore::new(self.token_file.clone())), self.token_key.clone())
    }

    /// Empty list controller at the configured page size.
    pub fn list_controller<R: ListRecord>(&self, schema: ListSchema) -> ListController<R> {
        ListController::new(schema, self.page_size)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Invalid {key}={raw:?}, using {default}");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(DashboardConfig::from_lookup(|_| None), DashboardConfig::default());
    }

    #[test]
    fn admin_feed_polls_faster_than_user_feed() {
        let cfg = DashboardConfig::default();
        assert!(cfg.admin_poll_interval < cfg.user_poll_interval);
    }

    #[test]
    fn reads_overrides() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("DASHBOARD_API_URL", "https://api.example.com/"),
            ("DASHBOARD_TOKEN_KEY", "adminToken"),
            ("DASHBOARD_ADMIN_POLL_SECS", "15"),
            ("DASHBOARD_PAGE_SIZE", "25"),
        ]));
        assert_eq!(cfg.api_base_url, "https://api.example.com");
        assert_eq!(cfg.token_key, "adminToken");
        assert_eq!(cfg.admin_poll_interval, Duration::from_secs(15));
        assert_eq!(cfg.page_size, 25);
    }

    #[test]
    fn auth_context_reads_configured_file_and_key() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"adminToken": "abc"}"#).unwrap();
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("DASHBOARD_TOKEN_FILE", path.to_str().unwrap()),
            ("DASHBOARD_TOKEN_KEY", "adminToken"),
        ]));
        assert_eq!(cfg.auth_context().bearer_token().as_deref(), Some("abc"));
    }

    #[test]
    fn list_controller_uses_configured_page_size() {
        let cfg = DashboardConfig::from_lookup(lookup(&[("DASHBOARD_PAGE_SIZE", "25")]));
        let c: ListController<crate::list::Record> = cfg.list_controller(ListSchema::new());
        assert_eq!(c.query().page_size(), 25);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("DASHBOARD_USER_POLL_SECS", "soon"),
            ("DASHBOARD_REQUEST_TIMEOUT_SECS", "0"),
            ("DASHBOARD_PAGE_SIZE", "0"),
        ]));
        assert_eq!(cfg.user_poll_interval, Duration::from_secs(DEFAULT_USER_POLL_SECS));
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    }
}

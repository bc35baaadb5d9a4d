use std::sync::Arc;

use super::store::TokenStore;

pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Session handle injected into every client. The token is looked up on
/// each call rather than cached, so signing out elsewhere takes effect on
/// the next request.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext").field("key", &self.key).finish_non_exhaustive()
    }
}

impl AuthContext {
    pub fn new(store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
        AuthContext { store, key: key.into() }
    }

    /// Current bearer token, `None` when signed out. Blank tokens count as
    /// signed out.
    pub fn bearer_token(&self) -> Option<String> {
        self.store
            .get(&self.key)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.bearer_token().is_some()
    }

    pub fn sign_out(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            log::warn!("Failed to clear session token: {e}");
        }
    }
}

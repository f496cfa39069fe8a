use std::sync::RwLock;

use crate::models::UserInfo;

/// Source of the signed-in account's credentials.
///
/// Cookie or keychain storage lives behind this seam.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn user_info(&self) -> Option<UserInfo>;
}

#[derive(Debug, Clone, Default)]
struct StoredTokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user_info: Option<UserInfo>,
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct TokenManager {
    inner: RwLock<StoredTokens>,
}

impl TokenManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access_token(token: impl Into<String>) -> Self {
        let manager = Self::new();
        manager.set_tokens(Some(token.into()), None);
        manager
    }

    pub fn set_tokens(&self, access_token: Option<String>, refresh_token: Option<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.access_token = access_token.filter(|t| !t.is_empty());
            guard.refresh_token = refresh_token.filter(|t| !t.is_empty());
        }
    }

    pub fn set_user_info(&self, user_info: Option<UserInfo>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.user_info = user_info;
        }
    }

    /// Drop everything (logout)
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = StoredTokens::default();
        }
    }
}

impl TokenProvider for TokenManager {
    fn access_token(&self) -> Option<String> {
        self.inner.read().ok().and_then(|g| g.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.read().ok().and_then(|g| g.refresh_token.clone())
    }

    fn user_info(&self) -> Option<UserInfo> {
        self.inner.read().ok().and_then(|g| g.user_info.clone())
    }
}

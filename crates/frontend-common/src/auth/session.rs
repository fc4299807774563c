//! Session state: the current user, its durable copy, and logout fan-out

use super::cookies::{CookieJar, expiry_scopes};
use super::logout::{LogoutHandle, LogoutReport};
use super::user::User;
use crate::config::AuthConfig;
use std::sync::Arc;
use subtuber_core::{KeyValueStore, SharedStore, StorageStatus, TokenStore};
use subtuber_http::ApiClient;
use tracing::{debug, info, warn};

/// Client-side authentication session.
///
/// Owned by the composition root and handed to consumers by reference. All
/// mutation goes through `&mut self`, so there is exactly one writer. The
/// in-memory user is authoritative; durable storage, the token, cookies and
/// the backend session are kept in step on a best-effort basis and their
/// failures are reported, never raised.
pub struct AuthSession {
    store: SharedStore,
    tokens: TokenStore,
    client: ApiClient,
    cookies: Arc<dyn CookieJar>,
    current_user: Option<User>,
    restore_status: StorageStatus,
}

impl AuthSession {
    /// Build the session, restoring the user persisted under `UserInfo`.
    ///
    /// An unreadable or unparseable record starts the session anonymous; the
    /// reason is kept in [`AuthSession::restore_status`]. The token store is
    /// the client's own when it has one, so the request hook and logout act
    /// on the same token.
    pub fn restore(store: SharedStore, client: ApiClient, cookies: Arc<dyn CookieJar>) -> Self {
        let tokens = client
            .token_store()
            .cloned()
            .unwrap_or_else(|| TokenStore::new(store.clone()));
        let (current_user, restore_status) = load_user(store.as_ref());

        debug!(
            logged_in = current_user.is_some(),
            status = ?restore_status,
            "Restored auth session"
        );

        Self {
            store,
            tokens,
            client,
            cookies,
            current_user,
            restore_status,
        }
    }

    /// Current user, if any
    pub fn user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Whether a user is present; derived on every call
    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// What happened when the persisted user was read at construction
    pub fn restore_status(&self) -> &StorageStatus {
        &self.restore_status
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Replace the current user and mirror it to durable storage
    pub fn set_user(&mut self, user: Option<User>) -> StorageStatus {
        let result = match &user {
            Some(user) => self.store.set(AuthConfig::USER_KEY, &user.to_json()),
            None => self.store.remove(AuthConfig::USER_KEY),
        };
        self.current_user = user;

        if let Err(err) = &result {
            warn!("Failed to persist user: {err}");
        }
        result.into()
    }

    /// End the session.
    ///
    /// The backend notification is built first, so it still carries the
    /// token, and then sent on a detached task. The local clears run
    /// immediately afterwards without waiting for it; each one is attempted
    /// regardless of the others.
    pub fn logout(&mut self) -> LogoutReport {
        let notification = LogoutHandle::spawn(self.client.clone(), self.client.logout_request());

        let user = self.set_user(None);
        let token = self.tokens.clear();
        let cookies = self.expire_cookies();

        info!("Logged out");
        LogoutReport {
            notification,
            user,
            token,
            cookies,
        }
    }

    fn expire_cookies(&self) -> Vec<StorageStatus> {
        let host = self.cookies.host();
        expiry_scopes(host.as_deref(), AuthConfig::COOKIE_PATH)
            .iter()
            .map(|scope| {
                let result = self.cookies.expire(AuthConfig::SESSION_COOKIE, scope);
                if let Err(err) = &result {
                    warn!(domain = ?scope.domain, path = %scope.path, "Failed to expire cookie: {err}");
                }
                StorageStatus::from(result)
            })
            .collect()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("current_user", &self.current_user)
            .field("restore_status", &self.restore_status)
            .finish_non_exhaustive()
    }
}

fn load_user(store: &dyn KeyValueStore) -> (Option<User>, StorageStatus) {
    let parsed = store
        .get(AuthConfig::USER_KEY)
        .and_then(|raw| raw.map_or(Ok(None), |raw| User::from_json(&raw)));

    match parsed {
        Ok(user) => (user, StorageStatus::Ok),
        Err(err) => {
            debug!("Starting anonymous, persisted user unusable: {err}");
            (None, err.into())
        }
    }
}

//! Session store
//!
//! `AuthStore` holds the session token and the signed-in user's profile.
//! The token is mirrored into a `TokenStorage` slot so a later store over
//! the same storage starts from it; the profile is only ever held in
//! memory and must be fetched again after a restart.
//!
//! A present profile always carries the required role. Every failure path
//! that touches the profile clears token and profile together, so callers
//! never observe a half-authenticated store.

use gatekeeper_client::{ApiClient, decode_data};
use gatekeeper_storage::TokenStorage;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::listeners::{ListenerId, ListenerRegistry};
use crate::models::{AuthSnapshot, Credentials, UserProfile};

/// Payload of a successful login response
#[derive(Debug, Deserialize)]
struct LoginPayload {
    token: String,
}

/// Client-side session store
pub struct AuthStore {
    api: Arc<dyn ApiClient>,
    storage: Arc<dyn TokenStorage>,
    config: AuthConfig,
    state: RwLock<AuthSnapshot>,
    listeners: ListenerRegistry,
}

impl AuthStore {
    /// Create a store with the default endpoints, storage key and role
    pub fn new(api: Arc<dyn ApiClient>, storage: Arc<dyn TokenStorage>) -> Self {
        Self::with_config(api, storage, AuthConfig::default())
    }

    /// Create a store, restoring the token from `storage`
    ///
    /// The profile starts empty: a restored token alone does not make the
    /// store authenticated until `fetch_profile` succeeds.
    pub fn with_config(
        api: Arc<dyn ApiClient>,
        storage: Arc<dyn TokenStorage>,
        config: AuthConfig,
    ) -> Self {
        let token = match storage.get(&config.token_key) {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored session token: {}", e);
                None
            }
        };

        if token.is_some() {
            debug!("Restored session token from storage");
        }

        Self {
            api,
            storage,
            config,
            state: RwLock::new(AuthSnapshot { token, user: None }),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Current session token
    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    /// Current user profile
    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().user.clone()
    }

    /// Both a token and a profile are present
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.read().clone()
    }

    /// Whether the current profile carries `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.state
            .read()
            .user
            .as_ref()
            .is_some_and(|user| user.has_role(role))
    }

    /// Role a profile must carry to be admitted
    pub fn required_role(&self) -> &str {
        &self.config.required_role
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a callback run after every state change
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AuthSnapshot) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Log in and load the profile
    ///
    /// The token is persisted before the profile is checked. If the
    /// profile cannot be loaded or lacks the required role, the store is
    /// cleared again before the error is returned. A failing login request
    /// leaves the store untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        info!("Logging in as {}", credentials.email);

        let fields = [
            ("email_or_phone", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let body = self
            .api
            .post_form(&self.config.login_path, &fields, None)
            .await?;
        let payload: LoginPayload = decode_data(body)?;

        if let Err(e) = self.storage.set(&self.config.token_key, &payload.token) {
            warn!("Failed to persist session token: {}", e);
            self.clear_auth();
            return Err(e.into());
        }

        self.update(|state| state.token = Some(payload.token));

        self.fetch_profile().await?;

        if !self.has_role(&self.config.required_role) {
            self.clear_auth();
            return Err(self.unauthorized());
        }

        info!("Logged in as {}", credentials.email);
        Ok(())
    }

    /// Load the profile of the current token
    ///
    /// On any failure, including a profile without the required role, the
    /// store is cleared and the failure returned.
    pub async fn fetch_profile(&self) -> Result<(), AuthError> {
        match self.load_profile().await {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("Profile fetch failed: {}", e);
                self.clear_auth();
                Err(e)
            }
        }
    }

    async fn load_profile(&self) -> Result<(), AuthError> {
        let token = self.token();

        let body = self
            .api
            .get(&self.config.profile_path, token.as_deref())
            .await?;
        let user: Option<UserProfile> = decode_data(body)?;

        let Some(user) = user.filter(|user| user.has_role(&self.config.required_role)) else {
            warn!(
                "Profile lacks required role {:?}, rejecting session",
                self.config.required_role
            );
            return Err(self.unauthorized());
        };

        self.update(|state| state.user = Some(user));
        Ok(())
    }

    /// Fetch the profile for a token restored from storage
    ///
    /// Returns `Ok(false)` without any request when no token is stored.
    pub async fn restore(&self) -> Result<bool, AuthError> {
        if self.token().is_none() {
            debug!("No stored session token to restore");
            return Ok(false);
        }

        self.fetch_profile().await?;
        Ok(true)
    }

    /// Log out on the server, then clear local state
    ///
    /// Local state is cleared whatever the server call does, including when
    /// the returned future is dropped before completion. A server failure is
    /// still returned after cleanup.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let cleanup = ClearOnDrop(self);
        let token = self.token();

        let result = self
            .api
            .delete(&self.config.logout_path, token.as_deref())
            .await;

        drop(cleanup);

        match result {
            Ok(_) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Server logout failed, local session cleared anyway: {}", e);
                Err(e.into())
            }
        }
    }

    /// Drop token and profile and remove the stored token
    ///
    /// Never fails: a storage error is logged and the in-memory state is
    /// cleared regardless. Calling it on a cleared store changes nothing.
    pub fn clear_auth(&self) {
        if let Err(e) = self.storage.remove(&self.config.token_key) {
            warn!("Failed to remove stored session token: {}", e);
        }

        let snapshot = {
            let mut state = self.state.write();
            if state.token.is_none() && state.user.is_none() {
                return;
            }
            *state = AuthSnapshot::default();
            state.clone()
        };

        debug!("Session cleared");
        self.listeners.notify(&snapshot);
    }

    /// Apply a state change and notify listeners outside the lock
    fn update(&self, apply: impl FnOnce(&mut AuthSnapshot)) {
        let snapshot = {
            let mut state = self.state.write();
            apply(&mut state);
            state.clone()
        };
        self.listeners.notify(&snapshot);
    }

    fn unauthorized(&self) -> AuthError {
        AuthError::Unauthorized {
            role: self.config.required_role.clone(),
        }
    }
}

/// Clears the store when dropped
struct ClearOnDrop<'a>(&'a AuthStore);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.clear_auth();
    }
}

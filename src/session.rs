//! Session State
//!
//! Credential and identity snapshot for the signed-in administrator, kept in
//! a pluggable key-value store. Created once at startup and handed around
//! through context; nothing here touches the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::models::Identity;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: Identity,
}

/// String key-value storage backing a session
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Window `localStorage`; survives reloads until logout or a storage clear
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl CredentialStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    warn!(key, "localStorage write rejected");
                }
            }
            None => warn!(key, "localStorage unavailable"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl CredentialStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Handle to the current session; clones share the same store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        Self::new(Arc::new(BrowserStorage))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Cached identity; an unreadable snapshot counts as none
    pub fn current_identity(&self) -> Option<Identity> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!(%err, "discarding unreadable identity snapshot");
                None
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_identity().is_some_and(|identity| identity.role.is_admin())
    }

    /// Persist a successful login.
    ///
    /// Only administrators get a session; for any other role whatever was
    /// stored before is cleared as well.
    pub fn establish(&self, response: LoginResponse) -> Result<Identity, AuthError> {
        let LoginResponse { token, user } = response;
        if !user.role.is_admin() {
            warn!(user = user.id, role = user.role.as_str(), "login rejected: not an administrator");
            self.logout();
            return Err(AuthError::NotAdministrator);
        }
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            self.logout();
            return Err(AuthError::MissingToken);
        };
        let snapshot = serde_json::to_string(&user).map_err(|e| AuthError::Snapshot(e.to_string()))?;

        self.store.set(TOKEN_KEY, &token);
        self.store.set(USER_KEY, &snapshot);
        info!(user = user.id, "session established");
        Ok(user)
    }

    /// Identity to resume with at startup.
    ///
    /// A token without an administrator snapshot is not a usable session and
    /// is cleared.
    pub fn restore(&self) -> Option<Identity> {
        if !self.is_authenticated() {
            return None;
        }
        match self.current_identity() {
            Some(identity) if identity.role.is_admin() => {
                info!(user = identity.id, "session restored");
                Some(identity)
            }
            _ => {
                warn!("stored session is not an administrator session");
                self.logout();
                None
            }
        }
    }

    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        info!("session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 1,
            name: "Admin".to_string(),
            phone: "2221234567".to_string(),
            role,
        }
    }

    fn response(token: Option<&str>, role: Role) -> LoginResponse {
        LoginResponse {
            token: token.map(str::to_string),
            user: identity(role),
        }
    }

    #[test]
    fn test_admin_login_sets_identity() {
        let session = Session::in_memory();

        let identity = session.establish(response(Some("jwt"), Role::Administrator)).unwrap();

        assert_eq!(identity.name, "Admin");
        assert_eq!(session.token().as_deref(), Some("jwt"));
        assert_eq!(session.current_identity(), Some(identity));
        assert!(session.is_admin());
    }

    #[test]
    fn test_collector_login_is_rejected_and_clears_credential() {
        let session = Session::in_memory();
        session.establish(response(Some("old"), Role::Administrator)).unwrap();

        let result = session.establish(response(Some("jwt"), Role::Collector));

        assert_eq!(result, Err(AuthError::NotAdministrator));
        assert!(!session.is_authenticated());
        assert_eq!(session.current_identity(), None);
        assert!(!session.is_admin());
    }

    #[test]
    fn test_login_without_token_fails() {
        let session = Session::in_memory();
        assert_eq!(
            session.establish(response(None, Role::Administrator)),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            session.establish(response(Some(""), Role::Administrator)),
            Err(AuthError::MissingToken)
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_logout_clears_everything() {
        let session = Session::in_memory();
        session.establish(response(Some("jwt"), Role::Administrator)).unwrap();

        session.logout();

        assert_eq!(session.token(), None);
        assert_eq!(session.current_identity(), None);
        assert_eq!(session.restore(), None);
    }

    #[test]
    fn test_clones_share_store() {
        let session = Session::in_memory();
        let other = session.clone();
        session.establish(response(Some("jwt"), Role::Administrator)).unwrap();

        assert_eq!(other.token().as_deref(), Some("jwt"));
        other.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_drops_non_admin_or_corrupt_snapshot() {
        let store = Arc::new(MemoryStorage::default());
        let session = Session::new(store.clone());

        store.set(TOKEN_KEY, "jwt");
        store.set(USER_KEY, "{not json");
        assert_eq!(session.restore(), None);
        assert_eq!(store.get(TOKEN_KEY), None);

        store.set(TOKEN_KEY, "jwt");
        store.set(USER_KEY, &serde_json::to_string(&identity(Role::Collector)).unwrap());
        assert_eq!(session.restore(), None);
        assert!(!session.is_authenticated());

        store.set(TOKEN_KEY, "jwt");
        store.set(USER_KEY, &serde_json::to_string(&identity(Role::Administrator)).unwrap());
        assert_eq!(session.restore().map(|i| i.id), Some(1));
    }

    #[test]
    fn test_login_response_decodes_backend_shape() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token":"abc","user":{"usuario_ID":4,"nombre":"Marta","telefono":"2229998877","rol":"administrador"}}"#,
        )
        .unwrap();
        assert_eq!(response.token.as_deref(), Some("abc"));
        assert_eq!(response.user.role, Role::Administrator);
    }
}

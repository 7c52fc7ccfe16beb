use std::cell::RefCell;

use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::session::CredentialStore;

/// Key holding the bearer token. Its absence is the sole "logged out" marker.
pub const TOKEN_STORAGE_KEY: &str = "jwt_token";

/// Credential adapter backed by `window.localStorage`, so the session
/// survives page reloads.
pub struct BrowserCredentials;

impl BrowserCredentials {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        let storage = web_sys::window()?.local_storage().ok().flatten();
        if storage.is_none() {
            get_logger().warn(
                LogComponent::Infrastructure("Storage"),
                "localStorage unavailable; session will not survive reloads",
            );
        }
        storage
    }
}

impl Default for BrowserCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for BrowserCredentials {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(TOKEN_STORAGE_KEY).ok().flatten()
    }

    fn store(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(TOKEN_STORAGE_KEY, token).is_err() {
                get_logger().error(
                    LogComponent::Infrastructure("Storage"),
                    "Failed to persist session token",
                );
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(TOKEN_STORAGE_KEY);
        }
    }
}

/// Volatile fallback for environments without localStorage. Also the
/// credential port used by native tests.
#[derive(Default)]
pub struct MemoryCredentials {
    token: RefCell<Option<String>>,
}

impl CredentialStore for MemoryCredentials {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn store(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}

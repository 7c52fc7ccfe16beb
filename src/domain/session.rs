use leptos::*;
use std::rc::Rc;

use crate::domain::logging::{LogComponent, get_logger};

/// Persistence port for the bearer credential, so the storage medium
/// (localStorage, cookie, keychain) is swappable without touching callers.
pub trait CredentialStore {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// Holds the current bearer token. The persisted copy is the sole source of
/// truth on startup; afterwards memory and storage are written together.
/// Token shape and expiry are never validated locally - the remote service
/// decides on the next authenticated call.
#[derive(Clone)]
pub struct SessionStore {
    token: RwSignal<Option<String>>,
    credentials: Rc<dyn CredentialStore>,
}

impl SessionStore {
    pub fn new(credentials: Rc<dyn CredentialStore>) -> Self {
        let token = create_rw_signal(credentials.load());
        Self { token, credentials }
    }

    /// Reactive handle for view gating.
    pub fn token(&self) -> RwSignal<Option<String>> {
        self.token
    }

    /// Non-reactive read for request construction.
    pub fn current_token(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.with(|t| t.is_some())
    }

    pub fn login(&self, token: String) {
        self.credentials.store(&token);
        self.token.set(Some(token));
        get_logger().info(LogComponent::Domain("Session"), "🔑 Session established");
    }

    pub fn logout(&self) {
        self.credentials.clear();
        self.token.set(None);
        get_logger().info(LogComponent::Domain("Session"), "Session cleared");
    }
}

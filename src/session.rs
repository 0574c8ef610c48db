//! Session
//!
//! The API token of the signed-in user, persisted in browser storage and
//! attached to every outgoing request while present.

use std::fmt;
use std::sync::{Arc, Mutex};

use leptos::prelude::*;
use reqwest::Url;

use crate::api::{ApiRequest, RequestFilter};

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Durable home of the token
pub trait TokenStore: Send + Sync {
    fn read(&self) -> Option<String>;
    /// `None` deletes the stored token
    fn write(&self, token: Option<&str>);
}

/// `window.localStorage` under a fixed key
pub struct BrowserTokenStore {
    key: String,
}

impl BrowserTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub fn available() -> bool {
        Self::storage().is_some()
    }
}

impl TokenStore for BrowserTokenStore {
    fn read(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok().flatten()
    }

    fn write(&self, token: Option<&str>) {
        let Some(storage) = Self::storage() else {
            log::warn!("[SESSION] localStorage unavailable, token not persisted");
            return;
        };
        let result = match token {
            Some(token) => storage.set_item(&self.key, token),
            None => storage.remove_item(&self.key),
        };
        if let Err(e) = result {
            log::warn!("[SESSION] Failed to write '{}': {:?}", self.key, e);
        }
    }
}

/// In-memory store; the token lasts until the page unloads
#[derive(Default)]
pub struct MemoryTokenStore(Mutex<Option<String>>);

#[cfg(test)]
impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self(Mutex::new(Some(token.to_string())))
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<String> {
        self.0.lock().ok().and_then(|guard| guard.clone())
    }

    fn write(&self, token: Option<&str>) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = token.map(str::to_string);
        }
    }
}

/// localStorage under `key` when the browser offers it, memory otherwise
pub fn token_store(key: &str, storage_available: bool) -> Arc<dyn TokenStore> {
    if storage_available {
        Arc::new(BrowserTokenStore::new(key))
    } else {
        log::warn!("[SESSION] localStorage unavailable, keeping the token in memory");
        Arc::new(MemoryTokenStore::default())
    }
}

/// Current authentication state
#[derive(Clone)]
pub struct Session {
    token: Option<String>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Create a session and load any persisted token
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let mut session = Self { token: None, store };
        session.load();
        session
    }

    pub fn load(&mut self) {
        if let Some(token) = self.store.read().filter(|token| !token.is_empty()) {
            self.token = Some(token);
        }
    }

    /// Set the token; `None` also removes the persisted copy
    pub fn save(&mut self, token: Option<String>) {
        self.store.write(token.as_deref());
        self.token = token;
    }

    pub fn delete(&mut self) {
        self.save(None);
    }

    pub fn authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn authorization(&self) -> Option<String> {
        self.token().map(|token| format!("Token {}", token))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.authenticated())
            .finish()
    }
}

impl RequestFilter for Session {
    fn apply(&self, request: &mut ApiRequest, _origin: &Url) {
        if let Some(value) = self.authorization() {
            request.set_header(AUTHORIZATION_HEADER, value);
        }
    }
}

/// Pipeline stage reading the live session signal at send time
pub struct SessionAuth(pub RwSignal<Session>);

impl RequestFilter for SessionAuth {
    fn apply(&self, request: &mut ApiRequest, origin: &Url) {
        self.0.with_untracked(|session| session.apply(request, origin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn request() -> ApiRequest {
        ApiRequest::new(Method::GET, Url::parse("http://localhost:8000/api/").unwrap())
    }

    fn origin() -> Url {
        Url::parse("http://localhost:8000/").unwrap()
    }

    #[test]
    fn loads_persisted_token() {
        let session = Session::new(Arc::new(MemoryTokenStore::with_token("abc")));
        assert!(session.authenticated());
        assert_eq!(session.token(), Some("abc"));
    }

    #[test]
    fn empty_store_is_anonymous() {
        let session = Session::new(Arc::new(MemoryTokenStore::default()));
        assert!(!session.authenticated());
        assert_eq!(session.authorization(), None);
    }

    #[test]
    fn save_and_delete_persist() {
        let store = Arc::new(MemoryTokenStore::default());
        let mut session = Session::new(store.clone());

        session.save(Some("t1".to_string()));
        assert!(session.authenticated());
        assert_eq!(store.read().as_deref(), Some("t1"));

        session.delete();
        assert!(!session.authenticated());
        assert_eq!(store.read(), None);
    }

    #[test]
    fn storage_less_browser_keeps_token_in_memory() {
        let store = token_store("apiToken", false);
        let mut session = Session::new(store.clone());
        assert!(!session.authenticated());

        session.save(Some("m1".to_string()));
        assert_eq!(store.read().as_deref(), Some("m1"));
        assert!(Session::new(store).authenticated());
    }

    #[test]
    fn authenticated_session_adds_token_header() {
        let session = Session::new(Arc::new(MemoryTokenStore::with_token("s3cret")));
        let mut req = request();
        session.apply(&mut req, &origin());
        assert_eq!(req.header(AUTHORIZATION_HEADER), Some("Token s3cret"));
    }

    #[test]
    fn anonymous_session_adds_nothing() {
        let session = Session::new(Arc::new(MemoryTokenStore::default()));
        let mut req = request();
        session.apply(&mut req, &origin());
        assert_eq!(req.header(AUTHORIZATION_HEADER), None);
    }
}

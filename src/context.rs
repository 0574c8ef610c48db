//! Application Context
//!
//! Shared state provided via Leptos Context API: configuration, session,
//! the API client and the entity collections.

use std::sync::Arc;

use leptos::prelude::*;
use reqwest::Url;

use crate::api::{page_origin, ApiClient, CsrfFilter, DocumentCookies, HttpTransport};
use crate::collection::Collection;
use crate::commands::ApiRoot;
use crate::config::Config;
use crate::models::{Sprint, Task, User};
use crate::session::{token_store, BrowserTokenStore, Session, SessionAuth};

/// State of the API root discovery
#[derive(Debug, Clone, PartialEq)]
pub enum ApiStatus {
    Pending,
    Ready(ApiRoot),
    Failed(String),
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub config: StoredValue<Config>,
    /// Current authentication state
    pub session: RwSignal<Session>,
    api: StoredValue<ApiClient>,
    /// Collection endpoints, once discovered
    pub endpoints: RwSignal<ApiStatus>,
    pub sprints: RwSignal<Collection<Sprint>>,
    pub tasks: RwSignal<Collection<Task>>,
    pub users: RwSignal<Collection<User>>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let store = token_store(&config.token_key, BrowserTokenStore::available());
        let session = RwSignal::new(Session::new(store));

        let origin = page_origin().unwrap_or_else(|| Url::parse("http://localhost/").expect("static URL"));
        let api = ApiClient::new(origin, Arc::new(HttpTransport))
            .with_filter(Arc::new(CsrfFilter::new(config.csrf_cookie.clone(), DocumentCookies)))
            .with_filter(Arc::new(SessionAuth(session)));

        Self {
            config: StoredValue::new(config),
            session,
            api: StoredValue::new(api),
            endpoints: RwSignal::new(ApiStatus::Pending),
            sprints: RwSignal::new(Collection::new()),
            tasks: RwSignal::new(Collection::new()),
            users: RwSignal::new(Collection::new()),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    /// Discovered endpoints (tracked); `None` until ready
    pub fn endpoints(&self) -> Option<ApiRoot> {
        match self.endpoints.get() {
            ApiStatus::Ready(root) => Some(root),
            _ => None,
        }
    }

    pub fn endpoints_untracked(&self) -> Option<ApiRoot> {
        match self.endpoints.get_untracked() {
            ApiStatus::Ready(root) => Some(root),
            _ => None,
        }
    }

    /// Whether a token is present (tracked)
    pub fn authenticated(&self) -> bool {
        self.session.with(Session::authenticated)
    }

    pub fn login(&self, token: String) {
        self.session.update(|session| session.save(Some(token)));
        log::info!("[SESSION] Signed in");
    }

    pub fn logout(&self) {
        self.session.update(Session::delete);
        log::info!("[SESSION] Signed out");
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

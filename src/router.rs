//! Hash Router
//!
//! Maps `location.hash` fragments to routes. Authentication is a gate in
//! front of every route, not a route of its own, so the login form never
//! shows up in the browser history.

use leptos::ev;
use leptos::prelude::*;
use percent_encoding::percent_decode_str;

use crate::models::{Id, Sprint};

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// `''`
    Home,
    /// `sprint/<id>`
    Sprint(Id),
}

impl Route {
    /// Match a fragment; `None` for fragments no route handles
    pub fn parse(fragment: &str) -> Option<Route> {
        let fragment = fragment.trim().trim_start_matches('#').trim_start_matches('/');
        // Query strings are not part of the route
        let path = fragment.split('?').next().unwrap_or_default();

        if path.is_empty() {
            return Some(Route::Home);
        }
        let id = path.strip_prefix("sprint/")?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        let id = percent_decode_str(id).decode_utf8_lossy();
        Some(Route::Sprint(Id::new(id.into_owned())))
    }

    pub fn fragment(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::Sprint(id) => format!("sprint/{}", id),
        }
    }

    pub fn href(&self) -> String {
        format!("#{}", self.fragment())
    }
}

impl From<&Sprint> for Route {
    fn from(sprint: &Sprint) -> Self {
        Route::Sprint(sprint.id.clone())
    }
}

/// Outcome of the authentication check in front of a route
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Open(Route),
    /// Show the login form; render `pending` once signed in
    Login { pending: Route },
}

impl Gate {
    /// Route rendered now; `None` while the login form is up
    pub fn open_route(&self) -> Option<Route> {
        match self {
            Gate::Open(route) => Some(route.clone()),
            Gate::Login { .. } => None,
        }
    }

    /// Content is hidden and the login form shown
    pub fn shows_login(&self) -> bool {
        matches!(self, Gate::Login { .. })
    }
}

pub fn gate(authenticated: bool, route: Route) -> Gate {
    if authenticated {
        Gate::Open(route)
    } else {
        Gate::Login { pending: route }
    }
}

/// Gate for the current route, if any route matched.
///
/// Re-run whenever the session changes: a pending route opens as soon as
/// a token is saved.
pub fn resolve(authenticated: bool, route: Option<Route>) -> Option<Gate> {
    route.map(|route| gate(authenticated, route))
}

/// Current `location.hash` without the leading `#`
pub fn current_fragment() -> String {
    web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default()
        .trim_start_matches('#')
        .to_string()
}

/// Navigate to `route` (fires `hashchange`)
pub fn navigate(route: &Route) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.location().set_hash(&route.fragment()) {
        log::warn!("[ROUTER] Cannot navigate to {}: {:?}", route.href(), e);
    }
}

/// Full page load of `path`
pub fn reload_to(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(path) {
            log::warn!("[ROUTER] Cannot load {}: {:?}", path, e);
        }
    }
}

/// Route signal following `hashchange`.
///
/// Fragments no route matches leave the current route in place.
pub fn use_hash_route() -> ReadSignal<Option<Route>> {
    let (route, set_route) = signal(Route::parse(&current_fragment()));

    let handle = window_event_listener(ev::hashchange, move |_| {
        let fragment = current_fragment();
        match Route::parse(&fragment) {
            Some(next) => {
                log::debug!("[ROUTER] -> {:?}", next);
                if route.get_untracked().as_ref() != Some(&next) {
                    set_route.set(Some(next));
                }
            }
            None => log::warn!("[ROUTER] No route for '#{}'", fragment),
        }
    });
    on_cleanup(move || handle.remove());

    route
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::Entity;
    use crate::session::{MemoryTokenStore, Session};

    #[test]
    fn home_fragments() {
        for fragment in ["", "#", "/", "#/", "  "] {
            assert_eq!(Route::parse(fragment), Some(Route::Home), "{:?}", fragment);
        }
    }

    #[test]
    fn sprint_fragments() {
        assert_eq!(Route::parse("sprint/42"), Some(Route::Sprint(Id::from(42))));
        assert_eq!(Route::parse("#sprint/42"), Some(Route::Sprint(Id::from("42"))));
        assert_eq!(Route::parse("sprint/a%20b"), Some(Route::Sprint(Id::from("a b"))));
        assert_eq!(Route::parse("sprint/7?tab=1"), Some(Route::Sprint(Id::from(7))));
    }

    #[test]
    fn unknown_fragments() {
        assert_eq!(Route::parse("sprint/"), None);
        assert_eq!(Route::parse("sprint/1/tasks"), None);
        assert_eq!(Route::parse("login"), None);
    }

    #[test]
    fn href_round_trips() {
        let route = Route::Sprint(Id::from(5));
        assert_eq!(route.href(), "#sprint/5");
        assert_eq!(Route::parse(&route.href()), Some(route));
        assert_eq!(Route::Home.href(), "#");
    }

    #[test]
    fn gate_defers_route_until_login() {
        let route = Route::Sprint(Id::from(42));
        assert_eq!(gate(true, route.clone()), Gate::Open(route.clone()));
        assert_eq!(gate(false, route.clone()), Gate::Login { pending: route });
    }

    #[test]
    fn login_resumes_pending_route() {
        let mut session = Session::new(Arc::new(MemoryTokenStore::default()));
        let route = Route::parse("#sprint/42");

        let before = resolve(session.authenticated(), route.clone()).unwrap();
        assert!(before.shows_login());
        assert_eq!(before.open_route(), None);
        assert_eq!(before, Gate::Login { pending: Route::Sprint(Id::from(42)) });

        session.save(Some("tok".to_string()));
        let after = resolve(session.authenticated(), route).unwrap();
        assert!(!after.shows_login());
        assert_eq!(after.open_route(), Some(Route::Sprint(Id::from(42))));
    }

    #[test]
    fn unmatched_fragment_has_no_gate() {
        assert_eq!(resolve(false, Route::parse("reports")), None);
    }

    #[test]
    fn created_sprint_route() {
        let sprint = Sprint::placeholder(Id::from(17));
        assert_eq!(Route::from(&sprint).href(), "#sprint/17");
    }
}

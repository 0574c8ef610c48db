//! Request Filters
//!
//! Stages every outgoing request passes through before it reaches the
//! transport. Filters only add headers.

use percent_encoding::percent_decode_str;
use reqwest::{Method, Url};
use wasm_bindgen::JsCast;

use super::ApiRequest;

/// Outgoing-request middleware
pub trait RequestFilter: Send + Sync {
    fn apply(&self, request: &mut ApiRequest, origin: &Url);
}

/// Methods that never need CSRF protection
pub fn is_safe_method(method: &Method) -> bool {
    matches!(method.as_str(), "GET" | "HEAD" | "OPTIONS" | "TRACE")
}

/// Same scheme, host and port
pub fn is_same_origin(target: &Url, origin: &Url) -> bool {
    target.origin() == origin.origin()
}

/// Value of cookie `name` in a `document.cookie` style string, decoded
pub fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

// ========================
// Cookie sources
// ========================

pub trait CookieSource: Send + Sync {
    fn cookies(&self) -> Option<String>;
}

/// Reads `document.cookie`
pub struct DocumentCookies;

impl CookieSource for DocumentCookies {
    fn cookies(&self) -> Option<String> {
        let document = web_sys::window()?.document()?;
        let html = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
        match html.cookie() {
            Ok(cookies) => Some(cookies),
            Err(e) => {
                log::warn!("[CSRF] Cannot read cookies: {:?}", e);
                None
            }
        }
    }
}

/// Fixed cookie string
#[cfg(test)]
pub struct StaticCookies(pub String);

#[cfg(test)]
impl CookieSource for StaticCookies {
    fn cookies(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

// ========================
// CSRF
// ========================

pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Copies the CSRF cookie into a header on unsafe same-origin requests
pub struct CsrfFilter<C> {
    cookie_name: String,
    source: C,
}

impl<C: CookieSource> CsrfFilter<C> {
    pub fn new(cookie_name: impl Into<String>, source: C) -> Self {
        Self { cookie_name: cookie_name.into(), source }
    }
}

impl<C: CookieSource> RequestFilter for CsrfFilter<C> {
    fn apply(&self, request: &mut ApiRequest, origin: &Url) {
        if is_safe_method(&request.method) || !is_same_origin(&request.url, origin) {
            return;
        }
        let token = self.source.cookies().and_then(|cookies| find_cookie(&cookies, &self.cookie_name));
        match token {
            Some(token) => request.set_header(CSRF_HEADER, token),
            None => log::debug!("[CSRF] No '{}' cookie for {} {}", self.cookie_name, request.method, request.url),
        }
    }
}

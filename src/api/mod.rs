//! REST API Client
//!
//! Request pipeline to the board API: resolve the URL against the page
//! origin, run every request filter, hand the request to the transport,
//! classify the response.

mod error;
mod filters;

use std::sync::Arc;

use futures::future::LocalBoxFuture;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::*;
pub use filters::*;

// ========================
// Request / Response
// ========================

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Fully resolved outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, headers: Vec::new(), body: None }
    }

    /// Set a header, replacing any previous value (names are case-insensitive)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ========================
// Transport
// ========================

pub type TransportFuture = LocalBoxFuture<'static, Result<ApiResponse, ApiError>>;

/// Sends a resolved request somewhere and returns the raw response
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> TransportFuture;
}

/// Browser `fetch` through reqwest
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture {
        Box::pin(async move {
            let client = reqwest::Client::new();
            let mut builder = client
                .request(request.method, request.url)
                .header("Accept", "application/json");
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder = match &request.body {
                Some(Body::Json(value)) => builder.json(value),
                Some(Body::Form(pairs)) => builder.form(pairs),
                None => builder,
            };

            let response = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
            Ok(ApiResponse { status, body })
        })
    }
}

// ========================
// Client
// ========================

/// Entry point for every API call
#[derive(Clone)]
pub struct ApiClient {
    origin: Url,
    transport: Arc<dyn Transport>,
    filters: Vec<Arc<dyn RequestFilter>>,
}

impl ApiClient {
    pub fn new(origin: Url, transport: Arc<dyn Transport>) -> Self {
        Self { origin, transport, filters: Vec::new() }
    }

    /// Append a stage to the request pipeline
    pub fn with_filter(mut self, filter: Arc<dyn RequestFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve an absolute or page-relative URL
    pub fn resolve(&self, url: &str) -> Result<Url, ApiError> {
        self.origin.join(url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
    }

    pub async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<Body>,
    ) -> Result<ApiResponse, ApiError> {
        let mut resolved = self.resolve(url)?;
        if !query.is_empty() {
            let mut pairs = resolved.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }

        let mut request = ApiRequest::new(method, resolved);
        request.body = body;
        for filter in &self.filters {
            filter.apply(&mut request, &self.origin);
        }

        let method = request.method.clone();
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            log::debug!("[API] {} {} -> {}", method, url, response.status);
            Ok(response)
        } else {
            log::warn!("[API] {} {} -> {}", method, url, response.status);
            Err(ApiError::from_response(response.status, &response.body))
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let response = self.send(Method::GET, url, query, None).await?;
        decode(&response)
    }

    pub async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let response = self.send(Method::POST, url, &[], Some(json_body(body)?)).await?;
        decode(&response)
    }

    pub async fn put_json<T: DeserializeOwned>(&self, url: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let response = self.send(Method::PUT, url, &[], Some(json_body(body)?)).await?;
        decode(&response)
    }

    pub async fn post_form<T: DeserializeOwned>(&self, url: &str, pairs: Vec<(String, String)>) -> Result<T, ApiError> {
        let response = self.send(Method::POST, url, &[], Some(Body::Form(pairs))).await?;
        decode(&response)
    }
}

fn json_body(body: &impl Serialize) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Origin of the current page, e.g. `http://localhost:8000/`
pub fn page_origin() -> Option<Url> {
    let origin = web_sys::window()?.location().origin().ok()?;
    Url::parse(&origin).ok()
}

// ========================
// Test transport
// ========================


#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::testing::{client, MockTransport};
    use super::*;

    struct Stamp;

    impl RequestFilter for Stamp {
        fn apply(&self, request: &mut ApiRequest, _origin: &Url) {
            request.set_header("X-Stamp", "1");
        }
    }

    #[test]
    fn relative_urls_resolve_against_origin_with_query() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"ok": true}));
        let api = client(&transport);

        let value: Value = block_on(api.get_json("/api/sprints/", &[("end_min", "2024-01-01".to_string())])).unwrap();
        assert_eq!(value, json!({"ok": true}));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].url.as_str(), "http://localhost:8000/api/sprints/?end_min=2024-01-01");
    }

    #[test]
    fn every_filter_runs_on_every_request() {
        let transport = MockTransport::new();
        transport.respond(201, json!({}));
        transport.respond(200, json!({}));
        let api = client(&transport).with_filter(Arc::new(Stamp));

        let _: Value = block_on(api.post_json("/api/tasks/", &json!({"name": "x"}))).unwrap();
        let _: Value = block_on(api.get_json("/api/tasks/", &[])).unwrap();

        for request in transport.requests() {
            assert_eq!(request.header("x-stamp"), Some("1"));
        }
    }

    #[test]
    fn error_status_is_classified() {
        let transport = MockTransport::new();
        transport.respond(400, json!({"name": ["This field is required."]}));
        let api = client(&transport);

        let result: Result<Value, _> = block_on(api.post_json("/api/sprints/", &json!({})));
        match result {
            Err(ApiError::Validation { errors, .. }) => {
                assert_eq!(errors.get("name"), ["This field is required."]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut request = ApiRequest::new(Method::GET, Url::parse("http://localhost/").unwrap());
        request.set_header("Authorization", "Token a");
        request.set_header("authorization", "Token b");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Token b"));
    }
}

//! Auth Commands
//!
//! Token login.

use serde::Deserialize;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Exchange form credentials for an API token
pub async fn login(api: &ApiClient, login_url: &str, credentials: Vec<(String, String)>) -> Result<String, ApiError> {
    let response: TokenResponse = api.post_form(login_url, credentials).await?;
    Ok(response.token)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::api::testing::{client, MockTransport};
    use crate::api::Body;

    fn credentials() -> Vec<(String, String)> {
        vec![
            ("username".to_string(), "demo".to_string()),
            ("password".to_string(), "secret".to_string()),
        ]
    }

    #[test]
    fn posts_form_encoded_credentials() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"token": "abc123"}));

        let token = block_on(login(&client(&transport), "/api/token/", credentials())).unwrap();
        assert_eq!(token, "abc123");

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(Body::Form(credentials())));
    }

    #[test]
    fn bad_credentials_are_validation_errors() {
        let transport = MockTransport::new();
        transport.respond(400, json!({"non_field_errors": ["Unable to log in with provided credentials."]}));

        let error = block_on(login(&client(&transport), "/api/token/", credentials())).unwrap_err();
        let placement = error.field_errors().place(&["username", "password"]);
        assert_eq!(placement.unmatched, vec!["Unable to log in with provided credentials.".to_string()]);
    }
}

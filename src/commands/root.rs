//! Root Commands
//!
//! Endpoint discovery from the API root.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};

/// Collection endpoints advertised by the API root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRoot {
    pub sprints: String,
    pub tasks: String,
    pub users: String,
}

pub async fn discover(api: &ApiClient, root_url: &str) -> Result<ApiRoot, ApiError> {
    let root: ApiRoot = api.get_json(root_url, &[]).await?;
    log::info!("[API] Endpoints: sprints={} tasks={} users={}", root.sprints, root.tasks, root.users);
    Ok(root)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::api::testing::{client, MockTransport};

    #[test]
    fn discovers_collection_endpoints() {
        let transport = MockTransport::new();
        transport.respond(200, json!({
            "sprints": "http://localhost:8000/api/sprints/",
            "tasks": "http://localhost:8000/api/tasks/",
            "users": "http://localhost:8000/api/users/"
        }));
        let root = block_on(discover(&client(&transport), "/api/")).unwrap();
        assert_eq!(root.tasks, "http://localhost:8000/api/tasks/");
        assert_eq!(transport.requests()[0].url.path(), "/api/");
    }

    #[test]
    fn incomplete_root_is_a_decode_error() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"sprints": "/api/sprints/"}));
        let result = block_on(discover(&client(&transport), "/api/"));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}

//! Task Commands
//!
//! Backlog loading, task creation and moves between columns.

use serde_json::Value;

use super::collection::{self, Attributes, FetchOptions};
use crate::api::{ApiClient, ApiError};
use crate::board::{moved_task, Column};
use crate::collection::{Changes, CollectionCell};
use crate::models::{Id, Task};

/// Tasks without a sprint, merged into the resident tasks
pub async fn get_backlog(api: &ApiClient, tasks_url: &str, tasks: &impl CollectionCell<Task>) -> Result<Changes, ApiError> {
    collection::fetch(api, tasks_url, tasks, FetchOptions::merge().query("backlog", "True")).await
}

/// Add the column's `(sprint, status)` to submitted form attributes
pub fn with_column(mut attributes: Attributes, column: Column, sprint_id: &Id) -> Attributes {
    let (sprint, status) = column.assignment(sprint_id);
    let sprint = match sprint {
        Some(id) => serde_json::to_value(id).unwrap_or(Value::Null),
        None => Value::Null,
    };
    attributes.insert("sprint".to_string(), sprint);
    attributes.insert("status".to_string(), Value::from(status.code()));
    attributes
}

pub async fn create_task(
    api: &ApiClient,
    tasks_url: &str,
    tasks: &impl CollectionCell<Task>,
    attributes: Attributes,
    column: Column,
    sprint_id: &Id,
) -> Result<Task, ApiError> {
    let attributes = with_column(attributes, column, sprint_id);
    collection::create(api, tasks_url, tasks, &attributes).await
}

/// Move a task to another column of the sprint board.
///
/// `Ok(None)` when the task is already in that column.
pub async fn move_task(
    api: &ApiClient,
    tasks_url: &str,
    tasks: &impl CollectionCell<Task>,
    task: &Task,
    column: Column,
    sprint_id: &Id,
) -> Result<Option<Task>, ApiError> {
    let Some(moved) = moved_task(task, sprint_id, column) else {
        return Ok(None);
    };
    log::info!("[TASK] Moving {} to {}", task.id, column.class());
    collection::save(api, tasks_url, tasks, &moved).await.map(Some)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::api::testing::{client, MockTransport};
    use crate::api::Body;
    use crate::collection::Collection;
    use crate::models::Entity;

    const TASKS: &str = "/api/tasks/";

    #[test]
    fn backlog_uses_filter_and_keeps_resident_tasks() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"count": 1, "results": [{"id": 8, "sprint": null}]}));
        let tasks: RefCell<Collection<Task>> = RefCell::new(Collection::new());
        tasks.borrow_mut().insert(Task::placeholder(Id::from(1)));

        block_on(get_backlog(&client(&transport), TASKS, &tasks)).unwrap();
        assert_eq!(transport.requests()[0].url.query(), Some("backlog=True"));
        assert_eq!(tasks.borrow().len(), 2);
    }

    #[test]
    fn new_task_carries_column_context() {
        let transport = MockTransport::new();
        transport.respond(201, json!({"id": 11, "name": "Write docs", "sprint": 4, "status": 2}));
        let tasks: RefCell<Collection<Task>> = RefCell::new(Collection::new());
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), json!("Write docs"));

        let task = block_on(create_task(&client(&transport), TASKS, &tasks, attributes, Column::Active, &Id::from(4))).unwrap();
        assert_eq!(task.sprint, Some(Id::from(4)));

        let request = &transport.requests()[0];
        assert_eq!(
            request.body,
            Some(Body::Json(json!({"name": "Write docs", "sprint": 4, "status": 2})))
        );
    }

    #[test]
    fn backlog_task_is_created_without_sprint() {
        let attributes = with_column(Attributes::new(), Column::Backlog, &Id::from(4));
        assert_eq!(Value::Object(attributes), json!({"sprint": null, "status": 1}));
    }

    #[test]
    fn move_saves_task_with_new_assignment() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"id": 3, "sprint": 4, "status": 4}));
        let tasks: RefCell<Collection<Task>> = RefCell::new(Collection::new());
        let task = Task::placeholder(Id::from(3));
        tasks.borrow_mut().insert(task.clone());

        let moved = block_on(move_task(&client(&transport), TASKS, &tasks, &task, Column::Done, &Id::from(4)))
            .unwrap()
            .unwrap();
        assert_eq!(moved.status, 4);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.url.path(), "/api/tasks/3");
        assert_eq!(tasks.borrow().get(&Id::from(3)).unwrap().status, 4);
    }

    #[test]
    fn move_into_same_column_sends_nothing() {
        let transport = MockTransport::new();
        let tasks: RefCell<Collection<Task>> = RefCell::new(Collection::new());
        let task = Task::placeholder(Id::from(3));

        let result = block_on(move_task(&client(&transport), TASKS, &tasks, &task, Column::Backlog, &Id::from(4))).unwrap();
        assert!(result.is_none());
        assert!(transport.requests().is_empty());
    }
}

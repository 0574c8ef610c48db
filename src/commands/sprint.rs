//! Sprint Commands
//!
//! Sprint listing and the sprint's task list.

use chrono::{Duration, NaiveDate};

use super::collection::{self, Attributes, FetchOptions};
use crate::api::{ApiClient, ApiError};
use crate::collection::{Changes, CollectionCell};
use crate::models::{Sprint, Task};

/// Earliest end date shown on the homepage, as an ISO date
pub fn recent_cutoff(today: NaiveDate, days: i64) -> String {
    (today - Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// Sprints ending `days` before `today` or later
pub async fn fetch_recent_sprints(
    api: &ApiClient,
    sprints_url: &str,
    sprints: &impl CollectionCell<Sprint>,
    today: NaiveDate,
    days: i64,
) -> Result<Changes, ApiError> {
    let options = FetchOptions::default().query("end_min", recent_cutoff(today, days));
    collection::fetch(api, sprints_url, sprints, options).await
}

/// Load the sprint's tasks from its `tasks` link, keeping resident tasks.
///
/// `None` when the sprint carries no such link.
pub async fn fetch_sprint_tasks(
    api: &ApiClient,
    tasks_url: &str,
    tasks: &impl CollectionCell<Task>,
    sprint: &Sprint,
) -> Option<Result<Changes, ApiError>> {
    let link = sprint.tasks_url()?;
    Some(collection::fetch(api, tasks_url, tasks, FetchOptions::merge().url(link)).await)
}

pub async fn create_sprint(
    api: &ApiClient,
    sprints_url: &str,
    sprints: &impl CollectionCell<Sprint>,
    attributes: &Attributes,
) -> Result<Sprint, ApiError> {
    collection::create(api, sprints_url, sprints, attributes).await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::api::testing::{client, MockTransport};
    use crate::collection::Collection;
    use crate::models::{Entity, Id, Links};
    use crate::router::Route;

    #[test]
    fn cutoff_is_seven_days_back() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(recent_cutoff(today, 7), "2024-02-27");
    }

    #[test]
    fn recent_sprints_are_filtered_by_end_min() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"count": 1, "results": [{"id": 1, "end": "2024-03-10"}]}));
        let cell: RefCell<Collection<Sprint>> = RefCell::new(Collection::new());
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        block_on(fetch_recent_sprints(&client(&transport), "/api/sprints/", &cell, today, 7)).unwrap();
        assert_eq!(transport.requests()[0].url.query(), Some("end_min=2024-02-27"));
        assert_eq!(cell.borrow().len(), 1);
    }

    #[test]
    fn sprint_tasks_come_from_link_and_merge() {
        let transport = MockTransport::new();
        transport.respond(200, json!({"count": 1, "results": [{"id": 2, "sprint": 1, "status": 2}]}));
        let tasks: RefCell<Collection<Task>> = RefCell::new(Collection::new());
        tasks.borrow_mut().insert(Task::placeholder(Id::from(1)));
        let sprint = Sprint {
            links: Links { self_link: None, tasks: Some("/api/tasks/?sprint=1".into()) },
            ..Sprint::placeholder(Id::from(1))
        };

        let result = block_on(fetch_sprint_tasks(&client(&transport), "/api/tasks/", &tasks, &sprint));
        assert!(result.unwrap().is_ok());
        assert_eq!(transport.requests()[0].url.query(), Some("sprint=1"));
        assert_eq!(tasks.borrow().len(), 2);
    }

    #[test]
    fn created_sprint_is_resident_and_routable() {
        let transport = MockTransport::new();
        transport.respond(201, json!({"id": 7, "name": "", "end": "2024-04-01", "description": ""}));
        let sprints: RefCell<Collection<Sprint>> = RefCell::new(Collection::new());
        let mut attributes = Attributes::new();
        attributes.insert("end".to_string(), json!("2024-04-01"));

        let sprint = block_on(create_sprint(&client(&transport), "/api/sprints/", &sprints, &attributes)).unwrap();
        assert_eq!(transport.requests()[0].method, reqwest::Method::POST);
        assert!(sprints.borrow().contains(&Id::from(7)));
        assert_eq!(Route::from(&sprint).href(), "#sprint/7");
    }

    #[test]
    fn sprint_without_tasks_link_fetches_nothing() {
        let transport = MockTransport::new();
        let tasks: RefCell<Collection<Task>> = RefCell::new(Collection::new());
        let sprint = Sprint::placeholder(Id::from(1));

        assert!(block_on(fetch_sprint_tasks(&client(&transport), "/api/tasks/", &tasks, &sprint)).is_none());
        assert!(transport.requests().is_empty());
    }
}

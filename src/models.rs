//! Frontend Models
//!
//! Entities returned by the board API. Every entity carries the
//! server-supplied `links` it should be addressed by.

use std::fmt;

use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ========================
// Identifiers
// ========================

/// Entity identifier.
///
/// The API sends numeric ids while routes and form fields carry strings,
/// so ids are kept in canonical string form and compare loosely:
/// `Id::from(42) == Id::from("42")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, when the id is numeric
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::new(value)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id(value.to_string())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Id(integral_text(&n)),
            Raw::Text(s) => Id::new(s),
        })
    }
}

/// `42.0` and `42` name the same entity
fn integral_text(n: &serde_json::Number) -> String {
    if let Some(value) = n.as_u64() {
        return value.to_string();
    }
    if let Some(value) = n.as_i64() {
        return value.to_string();
    }
    match n.as_f64() {
        Some(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 => {
            (value as i64).to_string()
        }
        _ => n.to_string(),
    }
}

// ========================
// Links
// ========================

/// Hypermedia links embedded in every entity payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<String>,
}

// ========================
// Entity contract
// ========================

/// Common contract for everything held in a [`Collection`](crate::collection::Collection)
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human readable kind, used in log lines
    const KIND: &'static str;

    /// Identity key (unique within a collection)
    fn key(&self) -> Id;

    fn links(&self) -> Option<&Links>;

    /// An entity that only knows its key, completed later by a fetch
    fn placeholder(key: Id) -> Self;

    /// Address used to fetch, save or delete this entity.
    ///
    /// The server-supplied `links.self` wins; otherwise the collection URL
    /// plus the encoded key.
    fn url(&self, collection_url: &str) -> String {
        match self.links().and_then(|links| links.self_link.as_deref()) {
            Some(link) if !link.is_empty() => link.to_string(),
            _ => conventional_url(collection_url, &self.key()),
        }
    }
}

/// `<collection>/<key>` with exactly one separating slash
pub fn conventional_url(collection_url: &str, key: &Id) -> String {
    let encoded = utf8_percent_encode(key.as_str(), NON_ALPHANUMERIC);
    if collection_url.ends_with('/') {
        format!("{}{}", collection_url, encoded)
    } else {
        format!("{}/{}", collection_url, encoded)
    }
}

// ========================
// Sprint
// ========================

/// Development iteration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "end_date")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub links: Links,
    /// Set when the sprint could not be loaded from the API
    #[serde(skip)]
    pub invalid: bool,
}

impl Sprint {
    /// Name, or "Sprint ending <date>" for unnamed sprints
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        match self.end {
            Some(end) => format!("Sprint ending {}", end.format("%Y-%m-%d")),
            None => format!("Sprint #{}", self.id),
        }
    }

    /// Where this sprint's tasks can be listed, if the API told us
    pub fn tasks_url(&self) -> Option<&str> {
        self.links.tasks.as_deref().filter(|url| !url.is_empty())
    }
}

impl Entity for Sprint {
    const KIND: &'static str = "sprint";

    fn key(&self) -> Id {
        self.id.clone()
    }

    fn links(&self) -> Option<&Links> {
        Some(&self.links)
    }

    fn placeholder(key: Id) -> Self {
        Sprint { id: key, ..Default::default() }
    }
}

// ========================
// Task
// ========================

/// Workflow state of a task inside a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo = 1,
    Active = 2,
    Testing = 3,
    Done = 4,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [TaskStatus::Todo, TaskStatus::Active, TaskStatus::Testing, TaskStatus::Done];

    pub fn from_code(code: u8) -> Option<TaskStatus> {
        match code {
            1 => Some(TaskStatus::Todo),
            2 => Some(TaskStatus::Active),
            3 => Some(TaskStatus::Testing),
            4 => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// CSS/status class for a task in this state
    pub fn class(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Active => "active",
            TaskStatus::Testing => "testing",
            TaskStatus::Done => "done",
        }
    }
}

fn default_status() -> u8 {
    TaskStatus::Todo.code()
}

/// Unit of work, optionally scheduled into a sprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Sprint foreign key; `None` means the task sits in the backlog
    #[serde(default)]
    pub sprint: Option<Id>,
    #[serde(default = "default_status")]
    pub status: u8,
    #[serde(default)]
    pub order: i32,
    /// Username of the assignee
    #[serde(default)]
    pub assigned: Option<String>,
    #[serde(default)]
    pub started: Option<NaiveDate>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<NaiveDate>,
    #[serde(default)]
    pub links: Links,
}

impl Task {
    /// Status label used to pick the column and style of the task.
    ///
    /// "unassigned" for backlog tasks; `None` for a sprint task whose
    /// status code is out of range.
    pub fn status_class(&self) -> Option<&'static str> {
        if self.in_backlog() {
            return Some("unassigned");
        }
        TaskStatus::from_code(self.status).map(TaskStatus::class)
    }

    pub fn in_backlog(&self) -> bool {
        self.sprint.is_none()
    }

    pub fn in_sprint(&self, sprint: &Sprint) -> bool {
        self.sprint.as_ref() == Some(&sprint.id)
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";

    fn key(&self) -> Id {
        self.id.clone()
    }

    fn links(&self) -> Option<&Links> {
        Some(&self.links)
    }

    fn placeholder(key: Id) -> Self {
        Task {
            id: key,
            name: String::new(),
            description: String::new(),
            sprint: None,
            status: default_status(),
            order: 0,
            assigned: None,
            started: None,
            due: None,
            completed: None,
            links: Links::default(),
        }
    }
}

// ========================
// User
// ========================

/// Board user, identified by username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub links: Links,
}

fn default_true() -> bool {
    true
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn key(&self) -> Id {
        Id::new(self.username.clone())
    }

    fn links(&self) -> Option<&Links> {
        Some(&self.links)
    }

    fn placeholder(key: Id) -> Self {
        User {
            username: key.as_str().to_string(),
            full_name: String::new(),
            is_active: true,
            links: Links::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(sprint: Option<Id>, status: u8) -> Task {
        Task { sprint, status, ..Task::placeholder(Id::from(7)) }
    }

    #[test]
    fn self_link_is_used_verbatim() {
        let sprint: Sprint = serde_json::from_value(json!({
            "id": 3,
            "name": "Alpha",
            "links": {"self": "http://api.example.com/api/sprints/3/?x=1"}
        }))
        .unwrap();
        assert_eq!(sprint.url("/api/sprints/"), "http://api.example.com/api/sprints/3/?x=1");
    }

    #[test]
    fn missing_self_link_falls_back_to_collection_url() {
        let sprint = Sprint::placeholder(Id::from(42));
        assert_eq!(sprint.url("/api/sprints/"), "/api/sprints/42");
        assert_eq!(sprint.url("/api/sprints"), "/api/sprints/42");
    }

    #[test]
    fn conventional_url_encodes_key() {
        let user = User::placeholder(Id::from("jane doe"));
        assert_eq!(user.url("/api/users/"), "/api/users/jane%20doe");
    }

    #[test]
    fn ids_compare_loosely() {
        let numeric: Id = serde_json::from_value(json!(42)).unwrap();
        let text: Id = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(numeric, text);
        assert_eq!(serde_json::to_value(&text).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(Id::from("abc")).unwrap(), json!("abc"));
    }

    #[test]
    fn integral_floats_are_plain_ids() {
        let float: Id = serde_json::from_value(json!(42.0)).unwrap();
        assert_eq!(float, Id::from(42));
        assert_eq!(float.as_number(), Some(42));

        let fraction: Id = serde_json::from_value(json!(4.5)).unwrap();
        assert_eq!(fraction.as_str(), "4.5");

        let task: Task = serde_json::from_value(json!({"id": 1.0, "sprint": 5.0})).unwrap();
        assert!(task.in_sprint(&Sprint::placeholder(Id::from("5"))));
    }

    #[test]
    fn status_class_for_backlog_and_sprint_tasks() {
        for status in 0..6 {
            assert_eq!(task(None, status).status_class(), Some("unassigned"));
        }
        let sprint = Some(Id::from(1));
        assert_eq!(task(sprint.clone(), 1).status_class(), Some("todo"));
        assert_eq!(task(sprint.clone(), 2).status_class(), Some("active"));
        assert_eq!(task(sprint.clone(), 3).status_class(), Some("testing"));
        assert_eq!(task(sprint.clone(), 4).status_class(), Some("done"));
        assert_eq!(task(sprint, 9).status_class(), None);
    }

    #[test]
    fn backlog_and_sprint_membership() {
        let sprint = Sprint::placeholder(Id::from(5));
        let backlog = task(None, 2);
        assert!(backlog.in_backlog());
        assert!(!backlog.in_sprint(&sprint));

        let scheduled: Task = serde_json::from_value(json!({"id": 1, "sprint": "5", "status": 3})).unwrap();
        assert!(!scheduled.in_backlog());
        assert!(scheduled.in_sprint(&sprint));
        assert!(!scheduled.in_sprint(&Sprint::placeholder(Id::from(6))));
    }

    #[test]
    fn sprint_payload_with_defaults() {
        let sprint: Sprint = serde_json::from_value(json!({
            "id": 9,
            "end": "2024-03-01",
            "links": {"self": "/api/sprints/9/", "tasks": "/api/tasks/?sprint=9"}
        }))
        .unwrap();
        assert_eq!(sprint.display_name(), "Sprint ending 2024-03-01");
        assert_eq!(sprint.tasks_url(), Some("/api/tasks/?sprint=9"));
        assert!(!sprint.invalid);
    }

    #[test]
    fn user_is_keyed_by_username() {
        let user: User = serde_json::from_value(json!({
            "id": 12, "username": "demo", "full_name": "Demo User", "is_active": true
        }))
        .unwrap();
        assert_eq!(user.key(), Id::from("demo"));
    }
}

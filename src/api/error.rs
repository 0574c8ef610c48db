//! API errors
//!
//! Failures surfaced by the request pipeline. Validation errors keep the
//! server's field-keyed messages so forms can show them inline.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Field name -> messages, as sent by the API on a rejected request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

/// Errors split by where a form shows them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub by_field: BTreeMap<String, Vec<String>>,
    /// Errors with no matching field, shown before the first label
    pub unmatched: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single message not tied to any input
    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push("non_field_errors", message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Read a JSON error object: `{"field": ["msg", ...], "detail": "msg"}`
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut errors = Self::new();
        for (field, messages) in object {
            match messages {
                Value::Array(list) => {
                    for message in list {
                        errors.push(field.clone(), json_message(message));
                    }
                }
                other => errors.push(field.clone(), json_message(other)),
            }
        }
        Some(errors)
    }

    /// Split errors between known form fields and the rest
    pub fn place(&self, fields: &[&str]) -> Placement {
        let mut placement = Placement::default();
        for (field, messages) in &self.0 {
            if fields.contains(&field.as_str()) {
                placement.by_field.insert(field.clone(), messages.clone());
            } else {
                placement.unmatched.extend(messages.iter().cloned());
            }
        }
        placement
    }
}

fn json_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Errors raised while talking to the API
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request never completed (offline, CORS, aborted)
    Network(String),
    InvalidUrl(String),
    /// Response body did not match the expected shape
    Decode(String),
    /// Rejected with field-keyed messages
    Validation { status: u16, errors: FieldErrors },
    NotFound,
    Status { status: u16, body: String },
}

impl ApiError {
    /// Classify a non-success response
    pub fn from_response(status: u16, body: &str) -> ApiError {
        if status == 404 {
            return ApiError::NotFound;
        }
        let parsed = serde_json::from_str::<Value>(body).ok();
        if (400..500).contains(&status) {
            if let Some(errors) = parsed.as_ref().and_then(FieldErrors::from_json) {
                if !errors.is_empty() {
                    return ApiError::Validation { status, errors };
                }
            }
        }
        ApiError::Status { status, body: body.to_string() }
    }

    /// Messages to show on a form for this failure
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ApiError::Validation { errors, .. } => errors.clone(),
            other => FieldErrors::general(other.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ApiError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ApiError::Validation { status, errors } => {
                write!(f, "Rejected ({})", status)?;
                for (field, messages) in errors.iter() {
                    write!(f, "; {}: {}", field, messages.join(" "))?;
                }
                Ok(())
            }
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::Status { status, .. } => write!(f, "Server returned {}", status),
        }
    }
}

impl std::error::Error for ApiError {}

//! Client-side Collections
//!
//! Ordered, id-keyed caches of entities filled from the API's paginated
//! list envelope.

use std::cell::RefCell;

use leptos::prelude::*;
use serde::Deserialize;

use crate::models::{Entity, Id};

/// Paginated list envelope returned by every list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "T: Entity")]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<T>>,
}

/// What a [`Collection::set`] call did, by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    pub added: Vec<Id>,
    pub changed: Vec<Id>,
    pub removed: Vec<Id>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Result of looking an id up before fetching it
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Already in the collection, no request needed
    Resident(T),
    /// Freshly inserted entity that only knows its key
    Placeholder(T),
}

/// Ordered entity cache with the cursors of the last fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub count: Option<u64>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next: None,
            previous: None,
            count: None,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the page cursors and hand back the page's entities
    pub fn parse(&mut self, page: Page<T>) -> Vec<T> {
        self.next = page.next;
        self.previous = page.previous;
        self.count = page.count;
        page.results.unwrap_or_default()
    }

    pub fn get(&self, key: &Id) -> Option<&T> {
        self.items.iter().find(|item| &item.key() == key)
    }

    pub fn contains(&self, key: &Id) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert, or replace in place when the key is already resident.
    /// Returns true when the entity was new.
    pub fn insert(&mut self, entity: T) -> bool {
        let key = entity.key();
        match self.items.iter_mut().find(|item| item.key() == key) {
            Some(existing) => {
                *existing = entity;
                false
            }
            None => {
                self.items.push(entity);
                true
            }
        }
    }

    pub fn remove(&mut self, key: &Id) -> Option<T> {
        let index = self.items.iter().position(|item| &item.key() == key)?;
        Some(self.items.remove(index))
    }

    /// Merge a batch of entities.
    ///
    /// Existing keys are updated in place, new keys appended in order.
    /// With `remove`, resident entities missing from the batch are dropped.
    pub fn set(&mut self, models: Vec<T>, remove: bool) -> Changes {
        let mut changes = Changes::default();
        let incoming: Vec<Id> = models.iter().map(Entity::key).collect();

        for model in models {
            let key = model.key();
            let unchanged = self.get(&key).map(|existing| same_payload(existing, &model)).unwrap_or(false);
            if self.insert(model) {
                changes.added.push(key);
            } else if !unchanged {
                changes.changed.push(key);
            }
        }

        if remove {
            let stale: Vec<Id> = self
                .items
                .iter()
                .map(Entity::key)
                .filter(|key| !incoming.contains(key))
                .collect();
            for key in stale {
                self.remove(&key);
                changes.removed.push(key);
            }
        }

        changes
    }

    /// Return the resident entity, or insert a placeholder for `key`.
    ///
    /// The existence check and the insertion happen in one call so two
    /// lookups for the same key can never produce two placeholders.
    pub fn lookup_or_placeholder(&mut self, key: &Id) -> Lookup<T> {
        if let Some(existing) = self.get(key) {
            return Lookup::Resident(existing.clone());
        }
        let placeholder = T::placeholder(key.clone());
        self.items.push(placeholder.clone());
        Lookup::Placeholder(placeholder)
    }
}

fn same_payload<T: Entity>(a: &T, b: &T) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ========================
// Storage cell
// ========================

/// Somewhere a collection lives: a signal in the app, a `RefCell` in tests
pub trait CollectionCell<T: Entity> {
    fn with_collection<R>(&self, f: impl FnOnce(&Collection<T>) -> R) -> R;
    fn update_collection<R>(&self, f: impl FnOnce(&mut Collection<T>) -> R) -> R;
}

impl<T: Entity> CollectionCell<T> for RwSignal<Collection<T>> {
    fn with_collection<R>(&self, f: impl FnOnce(&Collection<T>) -> R) -> R {
        f(&self.read_untracked())
    }

    fn update_collection<R>(&self, f: impl FnOnce(&mut Collection<T>) -> R) -> R {
        f(&mut self.write())
    }
}

impl<T: Entity> CollectionCell<T> for RefCell<Collection<T>> {
    fn with_collection<R>(&self, f: impl FnOnce(&Collection<T>) -> R) -> R {
        f(&self.borrow())
    }

    fn update_collection<R>(&self, f: impl FnOnce(&mut Collection<T>) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

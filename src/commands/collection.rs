//! Collection Commands
//!
//! Generic fetch/create/save operations that keep a client-side
//! collection in step with the API.

use serde_json::{Map, Value};

use crate::api::{ApiClient, ApiError};
use crate::collection::{Changes, CollectionCell, Lookup, Page};
use crate::models::{Entity, Id};

// ========================
// Argument Structs
// ========================

/// How a list fetch is issued and merged
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Fetch this address instead of the collection URL
    pub url: Option<String>,
    pub query: Vec<(&'static str, String)>,
    /// Drop resident entities missing from the response
    pub remove: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { url: None, query: Vec::new(), remove: true }
    }
}

impl FetchOptions {
    /// Merge into what is already resident
    pub fn merge() -> Self {
        Self { remove: false, ..Self::default() }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn query(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }
}

/// A `get_or_fetch` that could not complete; carries the placeholder
#[derive(Debug, Clone)]
pub struct FetchFailure<T> {
    pub entity: T,
    pub error: ApiError,
}

/// Entity attributes as submitted to the API
pub type Attributes = Map<String, Value>;

// ========================
// Commands
// ========================

/// Fetch one page of a list endpoint into the collection
pub async fn fetch<T: Entity>(
    api: &ApiClient,
    collection_url: &str,
    cell: &impl CollectionCell<T>,
    options: FetchOptions,
) -> Result<Changes, ApiError> {
    let url = options.url.as_deref().unwrap_or(collection_url);
    let page: Page<T> = api.get_json(url, &options.query).await?;
    let changes = cell.update_collection(|collection| {
        let models = collection.parse(page);
        collection.set(models, options.remove)
    });
    log::info!(
        "[{}] Fetched {}: +{} ~{} -{}",
        T::KIND,
        url,
        changes.added.len(),
        changes.changed.len(),
        changes.removed.len()
    );
    Ok(changes)
}

/// Resident entity, or a placeholder completed by a fetch.
///
/// The placeholder is inserted before the request is issued, so a second
/// call for the same key finds it resident and sends nothing.
pub async fn get_or_fetch<T: Entity>(
    api: &ApiClient,
    collection_url: &str,
    cell: &impl CollectionCell<T>,
    key: &Id,
) -> Result<T, FetchFailure<T>> {
    if let Some(resident) = cell.with_collection(|collection| collection.get(key).cloned()) {
        return Ok(resident);
    }
    let placeholder = match cell.update_collection(|collection| collection.lookup_or_placeholder(key)) {
        Lookup::Resident(entity) => return Ok(entity),
        Lookup::Placeholder(entity) => entity,
    };

    match api.get_json::<T>(&placeholder.url(collection_url), &[]).await {
        Ok(entity) => {
            cell.update_collection(|collection| collection.insert(entity.clone()));
            Ok(entity)
        }
        Err(error) => {
            log::warn!("[{}] Could not fetch {}: {}", T::KIND, key, error);
            Err(FetchFailure { entity: placeholder, error })
        }
    }
}

/// Create an entity; it joins the collection once the server accepted it
pub async fn create<T: Entity>(
    api: &ApiClient,
    collection_url: &str,
    cell: &impl CollectionCell<T>,
    attributes: &Attributes,
) -> Result<T, ApiError> {
    let created: T = api.post_json(collection_url, attributes).await?;
    log::info!("[{}] Created {}", T::KIND, created.key());
    cell.update_collection(|collection| collection.insert(created.clone()));
    Ok(created)
}

/// Save an entity to its own address and merge the server's copy
pub async fn save<T: Entity>(
    api: &ApiClient,
    collection_url: &str,
    cell: &impl CollectionCell<T>,
    entity: &T,
) -> Result<T, ApiError> {
    let saved: T = api.put_json(&entity.url(collection_url), entity).await?;
    cell.update_collection(|collection| collection.insert(saved.clone()));
    Ok(saved)
}

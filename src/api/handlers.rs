//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{ExpiringResourceCache, InstrumentedCache, Payload};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::models::{
    validate_payload, CountResponse, Decoding, FetchResponse, HealthResponse, ReplayResponse,
    ResourceQuery, RetrieveQuery, RetrieveResponse, StatsResponse, StoreResponse,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
///
/// Both caches share the one store; the store itself is kept for stats and
/// the cleanup task.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub objects: Arc<InstrumentedCache>,
    pub resources: Arc<ExpiringResourceCache>,
}

impl AppState {
    /// Creates a new AppState over `store`.
    ///
    /// The store is flushed when the object cache is created.
    pub fn new(
        store: Arc<MemoryStore>,
        fetcher: Arc<dyn Fetcher>,
        resource_ttl: Duration,
    ) -> Result<Self> {
        let objects = InstrumentedCache::new(store.clone())?;
        let resources = ExpiringResourceCache::new(store.clone(), fetcher, resource_ttl);

        Ok(Self {
            store,
            objects: Arc::new(objects),
            resources: Arc::new(resources),
        })
    }

    /// Creates a new AppState from configuration, fetching over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(fetcher),
            config.resource_ttl(),
        )
    }
}

/// Handler for POST /store
///
/// Stores a payload under a fresh key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> Result<Json<StoreResponse>> {
    if let Some(error_msg) = validate_payload(&payload) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = state.objects.store(payload)?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /retrieve/:key
///
/// Retrieves a payload, decoded as requested by `?as=`.
pub async fn retrieve_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<RetrieveQuery>,
) -> Result<Json<RetrieveResponse>> {
    let objects = &state.objects;
    let value = match query.decoding {
        Decoding::Raw => objects.retrieve(&key)?.map(Value::from),
        Decoding::Text => objects.retrieve_text(&key)?.map(Value::from),
        Decoding::Integer => objects.retrieve_integer(&key)?.map(Value::from),
        Decoding::Float => objects.retrieve_float(&key)?.map(Value::from),
    };

    match value {
        Some(value) => Ok(Json(RetrieveResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded call history of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let replay = state.objects.replay(&operation)?;
    Ok(Json(ReplayResponse::from(replay)))
}

/// Handler for GET /fetch?resource=
///
/// Returns the cached content of a resource, fetching it on a miss.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<FetchResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.resources.fetch(&query.resource).await?;
    let access_count = state.resources.access_count(&query.resource)?;

    Ok(Json(FetchResponse {
        resource: query.resource,
        content,
        access_count,
    }))
}

/// Handler for GET /count?resource=
///
/// Returns how many upstream fetches a resource has caused.
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<CountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let access_count = state.resources.access_count(&query.resource)?;

    Ok(Json(CountResponse {
        resource: query.resource,
        access_count,
    }))
}

/// Handler for GET /stats
///
/// Returns current store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.store.stats()?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

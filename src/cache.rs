//! Client-side query cache interface.
//!
//! Submitters never reach for a global store. They are handed a
//! `CacheDispatch` and use two primitives on it: invalidate everything under
//! a tag, or patch one cached collection in place.

use crate::api_contracts::MeterData;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Query name the meter list is cached under
pub const GET_METERS_QUERY: &str = "getMeters";

/// Tags cached queries are grouped by for invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheTag {
    Readings,
    MeterData,
}

/// Meters in insertion order, indexed by id where the server sent one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterCollection {
    entries: Vec<MeterData>,
    index: HashMap<i64, usize>,
}

impl MeterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a meter unless one with the same id is already present.
    /// Meters without an id are always appended. Returns true when inserted.
    pub fn add_one(&mut self, meter: MeterData) -> bool {
        if let Some(id) = meter.id {
            if self.index.contains_key(&id) {
                return false;
            }
            self.index.insert(id, self.entries.len());
        }
        self.entries.push(meter);
        true
    }

    /// Insert or replace a meter
    pub fn upsert_one(&mut self, meter: MeterData) {
        match meter.id.and_then(|id| self.index.get(&id).copied()) {
            Some(position) => self.entries[position] = meter,
            None => {
                self.add_one(meter);
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&MeterData> {
        self.index.get(&id).map(|position| &self.entries[*position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|meter| meter.name.as_str()).collect()
    }
}

/// Operations a submitter may perform on the client cache.
pub trait CacheDispatch: Send + Sync {
    /// Mark every cached query carrying one of `tags` stale.
    fn invalidate_tags(&self, tags: &[CacheTag]);

    /// Apply `mutator` to the collection cached under `query`.
    fn update_cached_collection(&self, query: &str, mutator: &mut dyn FnMut(&mut MeterCollection));
}

/// Something that happened to an `InMemoryCache`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Invalidated(CacheTag),
    CollectionUpdated { query: String },
}

#[derive(Debug, Default)]
struct CacheState {
    collections: HashMap<String, MeterCollection>,
    stale: HashSet<CacheTag>,
    events: Vec<CacheEvent>,
}

/// Process-local cache that records every dispatched operation.
///
/// Updating a query that was never seeded is recorded but changes nothing,
/// the same way a query cache only patches entries it already holds.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    state: Mutex<CacheState>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetched collection under `query`
    pub fn seed_collection(&self, query: &str, collection: MeterCollection) {
        let mut state = self.lock();
        state.collections.insert(query.to_string(), collection);
    }

    pub fn collection(&self, query: &str) -> Option<MeterCollection> {
        self.lock().collections.get(query).cloned()
    }

    pub fn is_stale(&self, tag: CacheTag) -> bool {
        self.lock().stale.contains(&tag)
    }

    /// Clear the stale mark after a refetch
    pub fn mark_fresh(&self, tag: CacheTag) {
        self.lock().stale.remove(&tag);
    }

    pub fn events(&self) -> Vec<CacheEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheDispatch for InMemoryCache {
    fn invalidate_tags(&self, tags: &[CacheTag]) {
        let mut state = self.lock();
        for tag in tags {
            state.stale.insert(*tag);
            state.events.push(CacheEvent::Invalidated(*tag));
        }
        tracing::debug!(?tags, "invalidated cache tags");
    }

    fn update_cached_collection(&self, query: &str, mutator: &mut dyn FnMut(&mut MeterCollection)) {
        let mut state = self.lock();
        state.events.push(CacheEvent::CollectionUpdated {
            query: query.to_string(),
        });
        match state.collections.get_mut(query) {
            Some(collection) => mutator(collection),
            None => tracing::debug!(query, "no cached entry to update"),
        }
    }
}

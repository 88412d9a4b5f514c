//! Ordered waypoint collection backed by a [`KeyValueStore`].
//!
//! The whole collection is written under [`STORAGE_KEY`] after every
//! mutation as a JSON array of `{id, name, location}` records. Storage
//! failures never abort an operation: the in-memory collection is always
//! updated and the failure is handed back as [`Persisted::Unsaved`].

use crate::{
    storage::{KeyValueStore, StorageError},
    waypoint::Waypoint,
};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "waypoints";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaypointError {
    #[error("waypoint id {0:?} already exists")]
    DuplicateId(String),
    #[error("no waypoint with id {0:?}")]
    UnknownId(String),
    #[error("waypoint {0:?} has a non-finite location")]
    InvalidLocation(String),
}

/// Whether a mutation reached durable storage.
#[must_use]
#[derive(Debug)]
pub enum Persisted {
    Saved,
    /// Nothing changed, nothing written
    Unchanged,
    /// The collection changed in memory but could not be written
    Unsaved(StorageError),
}

impl Persisted {
    pub fn warning(&self) -> Option<&StorageError> {
        match self {
            Persisted::Unsaved(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Persisted::Saved)
    }
}

pub struct WaypointStore<B> {
    backend: B,
    waypoints: Vec<Waypoint>,
}

impl<B: KeyValueStore> WaypointStore<B> {
    /// Load the collection from `backend`.
    ///
    /// Missing, unreadable or malformed data yields an empty collection.
    pub fn load(backend: B) -> Self {
        let waypoints = match backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Waypoint>>(&raw) {
                Ok(waypoints) => dedup(waypoints),
                Err(err) => {
                    warn!(error = %err, "stored waypoints are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "could not read stored waypoints, starting empty");
                Vec::new()
            }
        };
        debug!(count = waypoints.len(), "waypoints loaded");
        Self { backend, waypoints }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn get(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Append a waypoint. Its id must not already be present.
    pub fn add(&mut self, waypoint: Waypoint) -> Result<Persisted, WaypointError> {
        if self.get(&waypoint.id).is_some() {
            return Err(WaypointError::DuplicateId(waypoint.id));
        }
        if !waypoint.location.is_finite() {
            return Err(WaypointError::InvalidLocation(waypoint.id));
        }
        debug!(id = %waypoint.id, name = %waypoint.name, "waypoint added");
        self.waypoints.push(waypoint);
        Ok(self.persist())
    }

    /// Remove the waypoint with `id`, if any.
    pub fn remove(&mut self, id: &str) -> Persisted {
        let Some(index) = self.waypoints.iter().position(|w| w.id == id) else {
            return Persisted::Unchanged;
        };
        self.waypoints.remove(index);
        debug!(id, "waypoint removed");
        self.persist()
    }

    pub fn rename(
        &mut self,
        id: &str,
        name: impl Into<String>,
    ) -> Result<Persisted, WaypointError> {
        let waypoint = self
            .waypoints
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| WaypointError::UnknownId(id.to_string()))?;
        waypoint.name = name.into();
        Ok(self.persist())
    }

    fn persist(&mut self) -> Persisted {
        let result = serde_json::to_string(&self.waypoints)
            .map_err(StorageError::from)
            .and_then(|raw| self.backend.set(STORAGE_KEY, &raw));
        match result {
            Ok(()) => Persisted::Saved,
            Err(err) => {
                warn!(error = %err, "failed to persist waypoints");
                Persisted::Unsaved(err)
            }
        }
    }
}

// first occurrence of an id wins
fn dedup(waypoints: Vec<Waypoint>) -> Vec<Waypoint> {
    let mut seen = HashSet::new();
    let before = waypoints.len();
    let waypoints: Vec<_> = waypoints
        .into_iter()
        .filter(|w| seen.insert(w.id.clone()))
        .collect();
    if waypoints.len() != before {
        warn!(
            dropped = before - waypoints.len(),
            "stored waypoints contained duplicate ids"
        );
    }
    waypoints
}

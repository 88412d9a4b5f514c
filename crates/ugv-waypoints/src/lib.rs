//! Named target locations and their persistence.

mod storage;
mod store;
mod waypoint;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{Persisted, STORAGE_KEY, WaypointError, WaypointStore};
pub use waypoint::Waypoint;

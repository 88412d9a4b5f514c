use serde::{Deserialize, Serialize};
use ugv_core::geo::LatLng;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    pub location: LatLng,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: LatLng) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
        }
    }

    /// Create a waypoint with a fresh random id
    pub fn with_generated_id(name: impl Into<String>, location: LatLng) -> Self {
        Self::new(Uuid::new_v4().to_string(), name, location)
    }
}

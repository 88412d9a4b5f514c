//! Shared vehicle state.

use crate::geo::{Delta, LatLng};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Starting point used when no location is configured.
pub const DEFAULT_START: LatLng = LatLng::new(59.437, 24.7536);

/// Handle to the engine on/off flag.
///
/// Clones share the same flag, so an operator toggle can switch the engine
/// off while a drive holds the [`VehicleState`] mutably. The motion engine
/// observes the change at the top of its next frame.
#[derive(Clone, Debug, Default)]
pub struct EngineSwitch(Arc<AtomicBool>);

impl EngineSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }

    pub fn start(&self) {
        self.set(true)
    }

    pub fn stop(&self) {
        self.set(false)
    }
}

/// Position and motion of the vehicle plus its engine flag.
///
/// A clone is an independent snapshot: it starts with the same engine
/// setting but owns its own flag. Use [`VehicleState::engine_switch`] to
/// share the flag.
#[derive(Debug)]
pub struct VehicleState {
    pub location: LatLng,
    /// Scalar speed, never negative
    pub speed: f64,
    /// Unit offset toward the current target; `None` while stopped
    pub direction: Option<Delta>,
    engine: EngineSwitch,
}

impl Clone for VehicleState {
    fn clone(&self) -> Self {
        Self {
            location: self.location,
            speed: self.speed,
            direction: self.direction,
            engine: EngineSwitch::new(self.engine_enabled()),
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new(DEFAULT_START)
    }
}

impl VehicleState {
    /// A stopped vehicle at `location` with the engine off.
    pub fn new(location: LatLng) -> Self {
        Self {
            location,
            speed: 0.0,
            direction: None,
            engine: EngineSwitch::new(false),
        }
    }

    /// Reset to the stopped condition. Location is kept.
    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.direction = None;
    }

    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0 && self.direction.is_none()
    }

    pub fn engine_enabled(&self) -> bool {
        self.engine.is_enabled()
    }

    pub fn set_engine_enabled(&mut self, enabled: bool) {
        self.engine.set(enabled);
    }

    pub fn engine_switch(&self) -> EngineSwitch {
        self.engine.clone()
    }
}

//! Frame-driven motion toward a target.
//!
//! Each frame the engine accelerates the vehicle along a ramp capped at
//! `max_speed`, heads it straight at the target and advances it by
//! `step_unit * speed`. The drive ends when the vehicle is within one
//! frame's travel of the target (it is snapped onto it) or when the engine
//! is switched off. A step too small to change the location ends it as
//! stalled.
//!
//! There is no braking curve: the vehicle cruises at full speed until the
//! arrival snap.

use crate::{
    frame::FrameClock,
    geo::LatLng,
    observer::DriveObserver,
    vehicle::VehicleState,
};
use thiserror::Error;
use tracing::{debug, warn};

/// 20 km/h in m/s
pub const MAX_SPEED: f64 = 20.0 / 3.6;
pub const FRAME_RATE_HZ: f64 = 60.0;
/// Seconds of frames needed to reach `MAX_SPEED` from rest
pub const RAMP_SECONDS: f64 = 3.0;
pub const ACCELERATION: f64 = MAX_SPEED / (RAMP_SECONDS * FRAME_RATE_HZ);
/// Degrees of displacement per unit of speed per frame
pub const STEP_UNIT: f64 = 0.000_000_3;
/// Smallest full-speed travel per frame that still moves any coordinate
/// in `[-360, 360]`
pub const MIN_TRAVEL: f64 = 1e-12;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DriveError {
    #[error("engine not started")]
    EngineNotStarted,
    #[error("a drive is already in progress")]
    DriveAlreadyInProgress,
    #[error("target is not a finite location")]
    InvalidTarget,
}

pub type Result<T, E = DriveError> = std::result::Result<T, E>;

/// Kinematic constants, fixed for the lifetime of a [`MotionEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    pub max_speed: f64,
    /// Speed gained per frame
    pub acceleration: f64,
    pub step_unit: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            step_unit: STEP_UNIT,
        }
    }
}

impl MotionConfig {
    /// Tune the per-frame acceleration so `max_speed` is reached after
    /// `ramp_seconds` worth of frames at `rate_hz`.
    pub fn new(max_speed: f64, ramp_seconds: f64, rate_hz: f64, step_unit: f64) -> Self {
        Self {
            max_speed,
            acceleration: max_speed / (ramp_seconds * rate_hz),
            step_unit,
        }
    }

    /// Default speeds and step, ramp retuned for a different frame rate.
    pub fn for_frame_rate(rate_hz: f64) -> Self {
        Self::new(MAX_SPEED, RAMP_SECONDS, rate_hz, STEP_UNIT)
    }

    /// Distance covered in one frame at `speed`
    pub fn travel(&self, speed: f64) -> f64 {
        self.step_unit * speed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveState {
    Idle,
    Accelerating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Arrived,
    Cancelled,
    /// A frame's travel was too small to move the vehicle at all.
    Stalled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriveOutcome {
    pub termination: Termination,
    /// Frames executed, including the terminating one
    pub frames: u64,
}

/// Result of a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// No drive is active; nothing was touched.
    Idle,
    Moving { location: LatLng, speed: f64 },
    Finished(DriveOutcome),
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrive {
    target: LatLng,
    frames: u64,
}

#[derive(Debug, Default)]
pub struct MotionEngine {
    config: MotionConfig,
    active: Option<ActiveDrive>,
}

impl MotionEngine {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> DriveState {
        match self.active {
            Some(_) => DriveState::Accelerating,
            None => DriveState::Idle,
        }
    }

    pub fn is_driving(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the active drive
    pub fn target(&self) -> Option<LatLng> {
        self.active.map(|d| d.target)
    }

    /// Begin a drive toward `target`.
    ///
    /// Fails without touching the vehicle if the engine is off or another
    /// drive is still active. The observer receives the initial line.
    pub fn start<O: DriveObserver>(
        &mut self,
        vehicle: &VehicleState,
        target: LatLng,
        mut observer: O,
    ) -> Result<()> {
        if !vehicle.engine_enabled() {
            return Err(DriveError::EngineNotStarted);
        }
        if self.active.is_some() {
            return Err(DriveError::DriveAlreadyInProgress);
        }
        if !target.is_finite() {
            return Err(DriveError::InvalidTarget);
        }

        debug!(from = %vehicle.location, to = %target, "drive started");
        self.active = Some(ActiveDrive { target, frames: 0 });
        observer.frame(vehicle.location, target);
        Ok(())
    }

    /// Run one frame of the active drive.
    pub fn frame<O: DriveObserver>(
        &mut self,
        vehicle: &mut VehicleState,
        mut observer: O,
    ) -> Frame {
        let Some(drive) = self.active.as_mut() else {
            return Frame::Idle;
        };
        drive.frames += 1;
        let frames = drive.frames;
        let target = drive.target;

        if !vehicle.engine_enabled() {
            vehicle.stop();
            observer.clear();
            self.active = None;
            debug!(frames, at = %vehicle.location, "drive cancelled, engine off");
            return Frame::Finished(DriveOutcome {
                termination: Termination::Cancelled,
                frames,
            });
        }

        let delta = target - vehicle.location;
        let distance = delta.norm();

        // a zero distance would never pass the speed-scaled test while at rest
        if distance == 0.0 || distance < self.config.travel(vehicle.speed) {
            vehicle.location = target;
            vehicle.stop();
            observer.clear();
            observer.arrived(target);
            self.active = None;
            debug!(frames, at = %target, "drive arrived");
            return Frame::Finished(DriveOutcome {
                termination: Termination::Arrived,
                frames,
            });
        }

        vehicle.speed =
            (vehicle.speed.max(0.0) + self.config.acceleration).min(self.config.max_speed);

        // non-zero after the arrival check
        let heading = delta.normalize().unwrap_or_default();
        // never step past the target
        let travel = self.config.travel(vehicle.speed).min(distance);
        let next = vehicle.location + heading * travel;

        // below max speed the ramp can still grow the step
        if next == vehicle.location && vehicle.speed >= self.config.max_speed {
            vehicle.stop();
            observer.clear();
            self.active = None;
            warn!(
                frames,
                at = %vehicle.location,
                travel,
                "drive stalled, step below coordinate precision"
            );
            return Frame::Finished(DriveOutcome {
                termination: Termination::Stalled,
                frames,
            });
        }

        vehicle.direction = Some(heading);
        vehicle.location = next;

        observer.frame(vehicle.location, target);
        Frame::Moving {
            location: vehicle.location,
            speed: vehicle.speed,
        }
    }

    /// Abandon the active drive without touching the engine switch.
    ///
    /// Returns `false` if nothing was active.
    pub fn cancel<O: DriveObserver>(
        &mut self,
        vehicle: &mut VehicleState,
        mut observer: O,
    ) -> bool {
        let Some(drive) = self.active.take() else {
            return false;
        };
        vehicle.stop();
        observer.clear();
        debug!(frames = drive.frames, at = %vehicle.location, "drive aborted");
        true
    }

    /// Drive to `target`, one frame per `clock` tick, until arrival or the
    /// engine is switched off.
    ///
    /// The first frame runs immediately.
    pub async fn drive<C: FrameClock, O: DriveObserver>(
        &mut self,
        vehicle: &mut VehicleState,
        target: LatLng,
        mut clock: C,
        mut observer: O,
    ) -> Result<DriveOutcome> {
        self.start(vehicle, target, &mut observer)?;
        loop {
            match self.frame(vehicle, &mut observer) {
                Frame::Moving { .. } => {}
                Frame::Finished(outcome) => return Ok(outcome),
                Frame::Idle => {
                    return Ok(DriveOutcome {
                        termination: Termination::Cancelled,
                        frames: 0,
                    });
                }
            }
            clock.next_frame().await;
        }
    }
}

//! Terminal stand-ins for the map overlay and toast notifications.

use tracing::{debug, info, trace, warn};
use ugv_core::{
    geo::LatLng,
    observer::{DriveObserver, Notifier},
};

/// Tracks the vehicle-to-target line and logs progress.
///
/// Every frame is logged at trace level; every `report_every` frames an
/// info line with the remaining distance is emitted.
#[derive(Debug)]
pub struct TracingOverlay {
    report_every: u64,
    frames: u64,
    line: Option<(LatLng, LatLng)>,
}

impl TracingOverlay {
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every: report_every.max(1),
            frames: 0,
            line: None,
        }
    }

    /// The line currently drawn, from vehicle to target
    pub fn line(&self) -> Option<(LatLng, LatLng)> {
        self.line
    }
}

impl DriveObserver for TracingOverlay {
    fn frame(&mut self, current: LatLng, target: LatLng) {
        if self.line.is_none() {
            debug!(from = %current, to = %target, "overlay drawn");
        }
        self.line = Some((current, target));
        self.frames += 1;

        let remaining = current.distance(target);
        if self.frames % self.report_every == 0 {
            info!(at = %current, remaining, "driving");
        } else {
            trace!(at = %current, remaining, "frame");
        }
    }

    fn clear(&mut self) {
        if self.line.take().is_some() {
            debug!(frames = self.frames, "overlay removed");
        }
        self.frames = 0;
    }

    fn arrived(&mut self, target: LatLng) {
        info!(at = %target, "arrived");
    }
}

/// Prints operator warnings to stderr and logs them.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn warn(&mut self, message: &str) {
        warn!("{message}");
        eprintln!("warning: {message}");
    }
}

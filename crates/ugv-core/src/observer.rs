//! Hooks for collaborators that watch a drive.

use crate::geo::LatLng;

/// Receives per-frame updates so a line/marker overlay can be redrawn.
pub trait DriveObserver {
    /// Vehicle moved; redraw the line from `current` to `target`.
    fn frame(&mut self, current: LatLng, target: LatLng);

    /// The drive terminated (arrival or cancellation); remove the overlay.
    fn clear(&mut self);

    /// The vehicle reached `target`. Not called on cancellation.
    fn arrived(&mut self, _target: LatLng) {}
}

// Null observer for headless drives
impl DriveObserver for () {
    fn frame(&mut self, _current: LatLng, _target: LatLng) {}
    fn clear(&mut self) {}
}

impl<O: DriveObserver + ?Sized> DriveObserver for &mut O {
    fn frame(&mut self, current: LatLng, target: LatLng) {
        (**self).frame(current, target)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn arrived(&mut self, target: LatLng) {
        (**self).arrived(target)
    }
}

/// Operator-facing warnings (toasts in a UI, a terminal line here).
pub trait Notifier {
    fn warn(&mut self, message: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObserverEvent {
    Frame { current: LatLng, target: LatLng },
    Clear,
    Arrived(LatLng),
}

#[derive(Default, Debug)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    pub fn clear_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ObserverEvent::Clear))
            .count()
    }

    pub fn arrival_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ObserverEvent::Arrived(_)))
            .count()
    }
}

impl DriveObserver for RecordingObserver {
    fn frame(&mut self, current: LatLng, target: LatLng) {
        self.events.push(ObserverEvent::Frame { current, target });
    }

    fn clear(&mut self) {
        self.events.push(ObserverEvent::Clear);
    }

    fn arrived(&mut self, target: LatLng) {
        self.events.push(ObserverEvent::Arrived(target));
    }
}

#[derive(Default, Debug)]
pub struct RecordingNotifier {
    pub warnings: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

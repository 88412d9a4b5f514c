//! Real-time frame pacing on the tokio timer.

use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use ugv_core::frame::FrameClock;

/// Frames at a fixed rate.
///
/// Late ticks are skipped rather than bunched up, and no attempt is made to
/// compensate the motion for a frame that arrives late.
#[derive(Debug)]
pub struct IntervalFrames {
    interval: Interval,
}

impl IntervalFrames {
    /// Must be called inside a tokio runtime.
    pub fn new(rate_hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)));
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next frame boundary.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

impl FrameClock for IntervalFrames {
    fn next_frame(&mut self) -> impl Future<Output = ()> {
        self.tick()
    }
}

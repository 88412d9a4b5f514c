//! Frame pacing.
//!
//! A drive is a chain of discrete frames. The host decides how frames are
//! paced: a display refresh, a timer, or nothing at all in tests. Inter-frame
//! time is not measured; every frame is treated as one fixed time step.

use std::future::ready;

/// Source of frame boundaries for the drive loop.
pub trait FrameClock {
    /// Resolves when the next frame should run.
    fn next_frame(&mut self) -> impl Future<Output = ()>;
}

impl<C: FrameClock + ?Sized> FrameClock for &mut C {
    fn next_frame(&mut self) -> impl Future<Output = ()> {
        (**self).next_frame()
    }
}

/// Frames that are always ready. Drives run to completion without waiting.
#[derive(Debug, Default)]
pub struct ImmediateFrames {
    frames: u64,
}

impl ImmediateFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frame boundaries handed out so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameClock for ImmediateFrames {
    fn next_frame(&mut self) -> impl Future<Output = ()> {
        self.frames += 1;
        ready(())
    }
}

/// Runs `hook` at every frame boundary before yielding.
///
/// Tests use it to flip vehicle inputs (e.g. the engine switch) at a
/// chosen frame while the drive loop holds the vehicle.
pub struct HookFrames<F> {
    frames: u64,
    hook: F,
}

impl<F: FnMut(u64)> HookFrames<F> {
    pub fn new(hook: F) -> Self {
        Self { frames: 0, hook }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<F: FnMut(u64)> FrameClock for HookFrames<F> {
    fn next_frame(&mut self) -> impl Future<Output = ()> {
        self.frames += 1;
        (self.hook)(self.frames);
        ready(())
    }
}

//! Core motion simulation shared across the UGV simulator components.
//!
//! This crate intentionally avoids any rendering, storage or runtime
//! dependencies. Frame pacing is injected through [`frame::FrameClock`].

pub mod frame;
pub mod geo;
pub mod motion;
pub mod observer;
pub mod vehicle;

//! Host side of the UGV simulator: configuration, the operator console and
//! the collaborators (overlay, notifier, frame pacing) the motion engine
//! reports to.

pub mod config;
pub mod console;
pub mod frames;
pub mod overlay;

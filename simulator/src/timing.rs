//! Timing constants for the simulator.
//!
//! The detector runs on a millisecond clock supplied by the frame loop. In a
//! window that clock follows wall time; headless runs advance it by exactly
//! one frame per step.

#[cfg(feature = "window")]
use std::time::Duration;

/// Target frame time (~50 FPS).
#[cfg(feature = "window")]
pub const FRAME_TIME: Duration = Duration::from_millis(FRAME_MS);

/// Virtual clock step per headless frame.
pub const FRAME_MS: u64 = 20;

/// How long key feedback popups stay up.
pub const POPUP_DURATION_MS: u64 = 1500;

/// Length of a simulated ghost disturbance.
pub const GHOST_DURATION_MS: u64 = 1500;

//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, so they live here rather than in the
//! common crate.

use std::time::Duration;

/// Window frame time (~50 FPS). The main loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Telemetry tick period for a feed rate in Hz.
pub fn tick_period(tick_hz: u32) -> Duration { Duration::from_secs(1) / tick_hz.max(1) }

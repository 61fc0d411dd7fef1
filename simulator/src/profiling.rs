//! Frame timing and redraw counters.
//!
//! Counts how often the overlay actually repainted, per layer, against the
//! number of telemetry ticks it received.

use std::time::{Duration, Instant};

use overlay_common::DirtyMask;
use overlay_common::render::LAYER_COUNT;

/// Frame timing and redraw statistics.
pub struct ProfilingMetrics {
    // Frame timing (microseconds)
    pub frame_time_us: u32,
    pub render_time_us: u32,
    pub sleep_time_us: u32,

    pub frame_time_min_us: u32,
    pub frame_time_max_us: u32,
    frame_time_avg_us: f32,

    // Counters
    pub total_frames: u64,
    pub ticks: u64,
    pub paint_passes: u32,
    pub border_redraws: u32,
    pub layer_redraws: [u32; LAYER_COUNT],

    start_time: Instant,
}

impl ProfilingMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            total_frames: 0,
            ticks: 0,
            paint_passes: 0,
            border_redraws: 0,
            layer_redraws: [0; LAYER_COUNT],
            start_time: Instant::now(),
        }
    }

    /// Record frame timing for this frame.
    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
        sleep_time: Duration,
    ) {
        let total_us = total_time.as_micros() as u32;

        self.frame_time_us = total_us;
        self.render_time_us = render_time.as_micros() as u32;
        self.sleep_time_us = sleep_time.as_micros() as u32;
        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        self.total_frames += 1;
    }

    #[inline]
    pub fn inc_ticks(&mut self) { self.ticks += 1; }

    /// Count the repaints handled for `mask`.
    pub fn record_paint(
        &mut self,
        mask: DirtyMask,
    ) {
        if mask.is_empty() {
            return;
        }
        self.paint_passes += 1;
        self.border_redraws += u32::from(mask.window);
        if let Some(first) = mask.first_repaint_layer() {
            for count in &mut self.layer_redraws[first..] {
                *count += 1;
            }
        }
    }

    /// Share of ticks that led to a paint pass, in percent.
    pub fn paint_ratio(&self) -> f32 {
        if self.ticks == 0 {
            0.0
        } else {
            self.paint_passes as f32 * 100.0 / self.ticks as f32
        }
    }

    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    /// Uptime as HH:MM:SS.
    pub fn uptime_string(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

impl Default for ProfilingMetrics {
    fn default() -> Self { Self::new() }
}

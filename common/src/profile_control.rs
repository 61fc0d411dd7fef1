//! Custom profile plan executor.
//!
//! A plan is a list of `(acceleration, duration)` stages. While running, the
//! controller outputs the acceleration of the current stage and advances to
//! the next stage once the stage's scheduled end time has passed. It only has
//! two useful states: off and following the plan. `Stopping` is reported
//! near standstill with a non-positive command.
//!
//! Time is passed in by the caller as seconds on a monotonic clock, so the
//! controller never reads a clock itself.

use alloc::vec::Vec;

use log::{debug, info};

use crate::error::OverlayError;
use crate::telemetry::{CarState, ControlsState};

/// Speed below which a non-positive command counts as stopping (m/s).
pub const DEFAULT_V_EGO_STOPPING: f32 = 0.5;

// =============================================================================
// Plan Types
// =============================================================================

/// One stage of a profile plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanStage {
    /// Commanded acceleration (m/s²).
    pub accel: f32,
    /// Stage duration (s).
    pub duration: f32,
}

impl PlanStage {
    pub const fn new(
        accel: f32,
        duration: f32,
    ) -> Self {
        Self { accel, duration }
    }
}

/// Longitudinal control state reported by the controller.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LongControlState {
    #[default]
    Off,
    Stopping,
    /// Following the plan (closest match to the stock PID state).
    Pid,
}

/// Pick the longitudinal state for this update.
pub fn state_transition(
    active: bool,
    brake_pressed: bool,
    v_ego: f32,
    last_accel: f32,
    v_ego_stopping: f32,
) -> LongControlState {
    if !active || brake_pressed {
        LongControlState::Off
    } else if last_accel <= 0.0 && v_ego < v_ego_stopping {
        LongControlState::Stopping
    } else {
        LongControlState::Pid
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Executes a profile plan stage by stage.
#[derive(Clone, Debug)]
pub struct ProfileControl {
    /// `(accel, scheduled end time relative to start)` per stage.
    schedule: Vec<(f32, f32)>,
    current_stage: usize,
    start_time: f32,
    current_time: f32,
    running: bool,
    last_output_accel: f32,
    long_control_state: LongControlState,
    v_ego_stopping: f32,
}

impl ProfileControl {
    /// Build a controller for a plan.
    ///
    /// The plan must have at least one stage and every duration must be finite
    /// and non-negative.
    pub fn new(
        plan: &[PlanStage],
        v_ego_stopping: f32,
    ) -> Result<Self, OverlayError> {
        if plan.is_empty() {
            return Err(OverlayError::EmptyPlan);
        }

        let mut schedule = Vec::with_capacity(plan.len());
        let mut end = 0.0_f32;
        for (index, stage) in plan.iter().enumerate() {
            if !stage.duration.is_finite() || stage.duration < 0.0 {
                return Err(OverlayError::InvalidStageDuration {
                    index,
                    duration: stage.duration,
                });
            }
            end += stage.duration;
            schedule.push((stage.accel, end));
        }

        Ok(Self {
            schedule,
            current_stage: 0,
            start_time: 0.0,
            current_time: 0.0,
            running: false,
            last_output_accel: 0.0,
            long_control_state: LongControlState::Off,
            v_ego_stopping,
        })
    }

    /// Start the plan from its first stage.
    pub fn start(
        &mut self,
        now: f32,
    ) {
        self.current_stage = 0;
        self.start_time = now;
        self.current_time = now;
        self.running = true;
        info!("Profile started ({} stages)", self.schedule.len());
    }

    /// Stop the plan. The stage index moves past the last stage.
    pub fn stop(&mut self) {
        if self.running {
            info!("Profile stopped at stage {}", self.current_stage);
        }
        self.current_stage = self.schedule.len();
        self.running = false;
    }

    /// Advance the controller and return the clipped acceleration command.
    pub fn update(
        &mut self,
        active: bool,
        car: &CarState,
        accel_limits: (f32, f32),
        now: f32,
    ) -> f32 {
        self.current_time = now;
        self.long_control_state = state_transition(
            active,
            car.brake_pressed,
            car.v_ego,
            self.last_output_accel,
            self.v_ego_stopping,
        );

        let accel = if self.long_control_state == LongControlState::Off {
            self.stop();
            0.0
        } else if !self.running {
            0.0
        } else {
            // Advances at most one stage per update
            if now - self.start_time > self.schedule[self.current_stage].1 {
                self.current_stage += 1;
                debug!("Profile stage -> {}", self.current_stage);
            }

            if let Some(&(stage_accel, _)) = self.schedule.get(self.current_stage) {
                stage_accel
            } else {
                self.stop();
                0.0
            }
        };

        self.last_output_accel = accel.clamp(accel_limits.0, accel_limits.1);
        self.last_output_accel
    }

    /// Write the profile fields of `controlsState`.
    pub fn publish(
        &self,
        cs: &mut ControlsState,
    ) {
        cs.profile_running = self.running;
        cs.profile_stage = self.current_stage as u32;
        cs.profile_start_time = self.start_time;
        cs.profile_current_time = self.current_time;
        cs.profile_accel = self.last_output_accel;
    }

    #[inline]
    pub const fn is_running(&self) -> bool { self.running }

    #[inline]
    pub const fn current_stage(&self) -> usize { self.current_stage }

    #[inline]
    pub fn stage_count(&self) -> usize { self.schedule.len() }

    #[inline]
    pub const fn start_time(&self) -> f32 { self.start_time }

    #[inline]
    pub const fn current_time(&self) -> f32 { self.current_time }

    #[inline]
    pub const fn last_output_accel(&self) -> f32 { self.last_output_accel }

    #[inline]
    pub const fn long_control_state(&self) -> LongControlState { self.long_control_state }
}

// =============================================================================
// Unit Tests
// =============================================================================

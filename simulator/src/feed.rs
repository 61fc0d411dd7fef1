//! Synthetic telemetry feed.
//!
//! Produces one [`TelemetrySnapshot`] per tick. `carState` is published every
//! tick; `controlsState` is published every tick unless the feed is stalled,
//! in which case the channel keeps its last frame and message. Time is derived
//! from the tick counter so a headless run is deterministic.

use std::collections::VecDeque;

use log::{debug, info, warn};
use overlay_common::event_log::EventLog;
use overlay_common::profile_control::{DEFAULT_V_EGO_STOPPING, ProfileControl};
use overlay_common::telemetry::{AlertSize, AlertStatus};
use overlay_common::{CarState, Channel, ControlsState, OverlayError, TelemetrySnapshot};

use crate::settings::PlanSettings;

/// Longitudinal acceleration limits (m/s²).
const ACCEL_LIMITS: (f32, f32) = (-3.5, 2.0);

/// Deceleration while coasting disengaged (m/s²).
const COAST_DECEL: f32 = -0.3;

/// History entries kept in `profile_history`.
const HISTORY_LEN: usize = 3;

/// Seconds the "Profile Complete" alert stays up.
const COMPLETE_ALERT_SECS: f32 = 2.0;

struct LoadedPlan {
    id: String,
    control: ProfileControl,
}

/// Telemetry source for the simulator.
pub struct TelemetryFeed {
    tick_hz: f32,
    frame: u64,
    plans: Vec<LoadedPlan>,
    plan_idx: usize,
    enabled: bool,
    custom: bool,
    stalled: bool,
    brake: bool,
    v_ego: f32,
    a_ego: f32,
    history: VecDeque<String>,
    complete_until: Option<f32>,
    controls: Channel<ControlsState>,
}

impl TelemetryFeed {
    pub fn new(
        plans: &[PlanSettings],
        tick_hz: u32,
    ) -> Result<Self, OverlayError> {
        let plans = plans
            .iter()
            .map(|p| {
                Ok(LoadedPlan {
                    id: p.id.clone(),
                    control: ProfileControl::new(&p.plan_stages(), DEFAULT_V_EGO_STOPPING)?,
                })
            })
            .collect::<Result<Vec<_>, OverlayError>>()?;
        if plans.is_empty() {
            return Err(OverlayError::EmptyPlan);
        }

        Ok(Self {
            tick_hz: tick_hz.max(1) as f32,
            frame: 0,
            plans,
            plan_idx: 0,
            enabled: false,
            custom: false,
            stalled: false,
            brake: false,
            v_ego: 0.0,
            a_ego: 0.0,
            history: VecDeque::with_capacity(HISTORY_LEN),
            complete_until: None,
            controls: Channel::default(),
        })
    }

    // -------------------------------------------------------------------------
    // Controls
    // -------------------------------------------------------------------------

    pub fn toggle_engaged(
        &mut self,
        log: &mut EventLog,
    ) {
        self.enabled = !self.enabled;
        log.push(if self.enabled { "Engaged" } else { "Disengaged" });
    }

    pub fn toggle_custom(
        &mut self,
        log: &mut EventLog,
    ) {
        self.custom = !self.custom;
        log.push(if self.custom { "Mode: Custom" } else { "Mode: Stock" });
    }

    /// Select the next plan. Stops a running plan.
    pub fn next_plan(
        &mut self,
        log: &mut EventLog,
    ) {
        self.current_control_mut().stop();
        self.plan_idx = (self.plan_idx + 1) % self.plans.len();
        self.history.clear();
        log.push(&format!("Plan: {}", self.plans[self.plan_idx].id));
    }

    /// Start the selected plan. Requires custom mode and engagement.
    pub fn start_profile(
        &mut self,
        log: &mut EventLog,
    ) {
        if !(self.custom && self.enabled) {
            warn!("profile start ignored: custom mode must be engaged");
            log.push("Start needs Custom + Engaged");
            return;
        }
        let now = self.now();
        self.history.clear();
        self.complete_until = None;
        self.current_control_mut().start(now);
        log.push(&format!("Profile {} started", self.plans[self.plan_idx].id));
    }

    /// Stop or resume publishing `controlsState`.
    pub fn toggle_stall(
        &mut self,
        log: &mut EventLog,
    ) {
        self.stalled = !self.stalled;
        log.push(if self.stalled { "controlsState stalled" } else { "controlsState resumed" });
    }

    pub fn set_brake(
        &mut self,
        pressed: bool,
    ) {
        self.brake = pressed;
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advance one tick and return the resulting snapshot.
    pub fn tick(
        &mut self,
        log: &mut EventLog,
    ) -> TelemetrySnapshot {
        self.frame += 1;
        let now = self.now();
        let car = CarState {
            v_ego: self.v_ego,
            a_ego: self.a_ego,
            brake_pressed: self.brake,
        };

        let active = self.enabled && self.custom;
        let control = &mut self.plans[self.plan_idx].control;
        let was_running = control.is_running();
        let stage_before = control.current_stage();
        let profile_accel = control.update(active, &car, ACCEL_LIMITS, now);
        let stage_after = control.current_stage();
        let still_running = control.is_running();

        if was_running && still_running && stage_after != stage_before {
            debug!("stage {} -> {}", stage_before, stage_after);
            self.push_history(format!("S{} {:+.2}", stage_after + 1, profile_accel));
            log.push(&format!("Stage {}", stage_after + 1));
        } else if was_running && !still_running {
            info!("profile {} finished", self.plans[self.plan_idx].id);
            self.push_history(String::from("Done"));
            self.complete_until = Some(now + COMPLETE_ALERT_SECS);
            log.push("Profile finished");
        }

        let accel = if active {
            profile_accel
        } else if self.enabled {
            fake_signal(now, -0.8, 0.8, 0.2)
        } else {
            COAST_DECEL
        };
        self.integrate(accel);

        if !self.stalled {
            let msg = self.controls_message(now);
            self.controls = Channel::new(self.frame, msg);
        }

        TelemetrySnapshot {
            frame: self.frame,
            controls_state: self.controls.clone(),
            car_state: Channel::new(
                self.frame,
                CarState {
                    v_ego: self.v_ego,
                    a_ego: self.a_ego,
                    brake_pressed: self.brake,
                },
            ),
        }
    }

    fn controls_message(
        &mut self,
        now: f32,
    ) -> ControlsState {
        let plan = &self.plans[self.plan_idx];
        let mut cs = ControlsState {
            custom_profile_enabled: self.custom,
            enabled: self.enabled,
            profile_plan: plan.id.clone(),
            profile_history: self.history.iter().map(String::as_str).collect::<Vec<_>>().join(" "),
            ..ControlsState::default()
        };
        plan.control.publish(&mut cs);

        match self.complete_until {
            Some(until) if now < until => {
                cs.alert_text1 = String::from("Profile Complete");
                cs.alert_status = AlertStatus::Normal;
                cs.alert_size = AlertSize::Small;
            }
            Some(_) => self.complete_until = None,
            None => {}
        }
        if self.brake && self.enabled {
            cs.alert_text1 = String::from("Brake Pressed");
            cs.alert_text2 = String::from("Controls will disengage");
            cs.alert_status = AlertStatus::UserPrompt;
            cs.alert_size = AlertSize::Mid;
        }
        cs
    }

    fn integrate(
        &mut self,
        accel: f32,
    ) {
        let dt = 1.0 / self.tick_hz;
        let v = (self.v_ego + accel * dt).max(0.0);
        self.a_ego = (v - self.v_ego) / dt;
        self.v_ego = v;
    }

    fn push_history(
        &mut self,
        entry: String,
    ) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    fn current_control_mut(&mut self) -> &mut ProfileControl { &mut self.plans[self.plan_idx].control }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Feed time in seconds.
    #[inline]
    pub fn now(&self) -> f32 { self.frame as f32 / self.tick_hz }

    #[inline]
    pub const fn frame(&self) -> u64 { self.frame }

    #[inline]
    pub const fn is_stalled(&self) -> bool { self.stalled }

    #[inline]
    pub const fn is_enabled(&self) -> bool { self.enabled }

    #[inline]
    pub const fn is_custom(&self) -> bool { self.custom }

    pub fn plan_id(&self) -> &str { &self.plans[self.plan_idx].id }

    pub fn is_profile_running(&self) -> bool { self.plans[self.plan_idx].control.is_running() }
}

/// Smooth signal oscillating between `min` and `max`.
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}

// =============================================================================
// Tests
// =============================================================================

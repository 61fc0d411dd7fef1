//! Telemetry snapshot read by the overlay on every tick.
//!
//! A snapshot is a set of named channels. Each channel carries the frame on
//! which it was last received; channels update independently so one can lag
//! behind another. A channel that was never received has frame 0, which is
//! stale relative to any session started on a positive frame.
//!
//! Snapshots are built by the telemetry feed and only borrowed by the overlay
//! for the duration of one tick.

use alloc::string::String;

use crate::config::{CONTROLS_TIMEOUT_FRAMES, STARTUP_GRACE_FRAMES, TAKE_CONTROL_WINDOW_FRAMES};

// =============================================================================
// Channels
// =============================================================================

/// Named telemetry channels the overlay reads.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChannelId {
    ControlsState,
    CarState,
}

impl ChannelId {
    /// Channel name as published by the feed.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ControlsState => "controlsState",
            Self::CarState => "carState",
        }
    }

    /// Look up a channel by its published name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "controlsState" => Some(Self::ControlsState),
            "carState" => Some(Self::CarState),
            _ => None,
        }
    }
}

/// A channel's latest message together with its receive frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Channel<T> {
    /// Feed frame on which this message was received (0 = never).
    pub rcv_frame: u64,
    pub msg: T,
}

impl<T> Channel<T> {
    pub const fn new(
        rcv_frame: u64,
        msg: T,
    ) -> Self {
        Self { rcv_frame, msg }
    }

    /// True if the channel has not been received since `started_frame`.
    #[inline]
    pub const fn is_stale(
        &self,
        started_frame: u64,
    ) -> bool {
        self.rcv_frame < started_frame
    }
}

// =============================================================================
// Alerts
// =============================================================================

/// Alert priority as published in `controlsState`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AlertStatus {
    #[default]
    Normal,
    UserPrompt,
    Critical,
}

/// Alert footprint on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AlertSize {
    /// No alert shown.
    #[default]
    None,
    Small,
    Mid,
    Full,
}

// =============================================================================
// Channel Messages
// =============================================================================

/// Fields of the `controlsState` channel read by the overlay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlsState {
    /// Custom profile mode selected instead of stock behavior.
    pub custom_profile_enabled: bool,
    /// Controls engaged.
    pub enabled: bool,
    /// Profile plan currently executing.
    pub profile_running: bool,
    /// Selected plan identifier (decimal string).
    pub profile_plan: String,
    /// Zero-based stage index within the plan.
    pub profile_stage: u32,
    /// Plan start time in seconds.
    pub profile_start_time: f32,
    /// Time of the last plan update in seconds.
    pub profile_current_time: f32,
    /// Acceleration commanded by the plan (m/s²).
    pub profile_accel: f32,
    /// Free-form history text.
    pub profile_history: String,

    pub alert_text1: String,
    pub alert_text2: String,
    pub alert_status: AlertStatus,
    pub alert_size: AlertSize,
}

/// Fields of the `carState` channel read by the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CarState {
    /// Vehicle speed (m/s).
    pub v_ego: f32,
    /// Vehicle acceleration (m/s²).
    pub a_ego: f32,
    pub brake_pressed: bool,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Point-in-time view of the telemetry feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetrySnapshot {
    /// The feed's own frame counter at the time of this snapshot.
    pub frame: u64,
    pub controls_state: Channel<ControlsState>,
    pub car_state: Channel<CarState>,
}

impl TelemetrySnapshot {
    /// Receive frame of a channel.
    pub const fn rcv_frame(
        &self,
        channel: ChannelId,
    ) -> u64 {
        match channel {
            ChannelId::ControlsState => self.controls_state.rcv_frame,
            ChannelId::CarState => self.car_state.rcv_frame,
        }
    }

    /// Receive frame by channel name. Unknown names read as never received.
    pub fn rcv_frame_by_name(
        &self,
        name: &str,
    ) -> u64 {
        ChannelId::from_name(name).map_or(0, |id| self.rcv_frame(id))
    }

    /// Ticks since `controlsState` was last received.
    #[inline]
    pub const fn controls_age(&self) -> u64 { self.frame.saturating_sub(self.controls_state.rcv_frame) }

    /// Engagement from `controlsState`. A message older than the session reads as disengaged.
    #[inline]
    pub const fn is_engaged(
        &self,
        started_frame: u64,
    ) -> bool {
        !self.controls_state.is_stale(started_frame) && self.controls_state.msg.enabled
    }
}

// =============================================================================
// Alert Derivation
// =============================================================================

/// Alert shown by the alert layer.
///
/// The default value (empty text, no size) means "no alert".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alert {
    pub text1: String,
    pub text2: String,
    pub status: AlertStatus,
    pub size: AlertSize,
}

impl Alert {
    fn new(
        text1: &str,
        text2: &str,
        status: AlertStatus,
        size: AlertSize,
    ) -> Self {
        Self {
            text1: String::from(text1),
            text2: String::from(text2),
            status,
            size,
        }
    }

    /// True if nothing is displayed.
    #[inline]
    pub fn is_empty(&self) -> bool { self.size == AlertSize::None }

    /// Derive the alert for this tick.
    ///
    /// Controls that have not been seen this session only raise an alert after
    /// the startup grace period. Controls that stopped updating raise a
    /// critical alert. Otherwise the alert published in `controlsState` wins.
    pub fn derive(
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    ) -> Self {
        let cs = &snapshot.controls_state;
        let since_start = snapshot.frame.saturating_sub(started_frame);

        if cs.is_stale(started_frame) {
            if since_start > STARTUP_GRACE_FRAMES {
                return Self::new(
                    "System Unavailable",
                    "Waiting for controls to start",
                    AlertStatus::Normal,
                    AlertSize::Mid,
                );
            }
            return Self::default();
        }

        let age = snapshot.controls_age();
        if age > CONTROLS_TIMEOUT_FRAMES {
            if cs.msg.enabled && age - CONTROLS_TIMEOUT_FRAMES < TAKE_CONTROL_WINDOW_FRAMES {
                return Self::new(
                    "TAKE CONTROL IMMEDIATELY",
                    "Controls Unresponsive",
                    AlertStatus::Critical,
                    AlertSize::Full,
                );
            }
            return Self::new("Controls Unresponsive", "Reboot Device", AlertStatus::Critical, AlertSize::Mid);
        }

        if cs.msg.alert_size == AlertSize::None {
            return Self::default();
        }
        Self {
            text1: cs.msg.alert_text1.clone(),
            text2: cs.msg.alert_text2.clone(),
            status: cs.msg.alert_status,
            size: cs.msg.alert_size,
        }
    }
}

// =============================================================================
// Driving Status
// =============================================================================

/// Overall driving status used to pick the border color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DrivingStatus {
    #[default]
    Disengaged,
    Engaged,
    Warning,
    Critical,
}

impl DrivingStatus {
    /// Status from the current alert and engagement.
    ///
    /// Alert priority overrides engagement.
    pub fn from_alert(
        alert: &Alert,
        enabled: bool,
    ) -> Self {
        if !alert.is_empty() {
            match alert.status {
                AlertStatus::Critical => return Self::Critical,
                AlertStatus::UserPrompt => return Self::Warning,
                AlertStatus::Normal => {}
            }
        }
        if enabled { Self::Engaged } else { Self::Disengaged }
    }
}

// =============================================================================
// Tests
// =============================================================================

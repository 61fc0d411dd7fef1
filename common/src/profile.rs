//! Profile status derivation for the diagnostic panel.
//!
//! [`ProfileStatusDeriver::derive`] turns one telemetry snapshot into the
//! ordered lines shown in the profile panel. It is pure: no retained state,
//! the same snapshot always yields the same lines.
//!
//! # Line Order
//!
//! ```text
//! Custom Profile Mode | Stock Mode        headline
//! <profile name>      | Disengaged
//! Engaged / Disengaged                    engagement (see derive)
//! Profile Running / Profile Stopped
//! Plan, Stage, Accel, Elapsed, Speed, Car Accel
//! <history text>
//! ```
//!
//! Numbers are always printed with two decimals so digit width stays stable
//! while values change.
//!
//! # Staleness
//!
//! When `controlsState` was last received before the session started, the
//! panel shows two "Unknown" lines instead of data left over from a previous
//! session.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::OverlayError;
use crate::telemetry::TelemetrySnapshot;

// =============================================================================
// Display Strings
// =============================================================================

pub const UNKNOWN_LINE: &str = "Unknown";
pub const CUSTOM_MODE_HEADLINE: &str = "Custom Profile Mode";
pub const STOCK_MODE_HEADLINE: &str = "Stock Mode";
pub const ENGAGED_LINE: &str = "Engaged";
pub const DISENGAGED_LINE: &str = "Disengaged";
pub const RUNNING_LINE: &str = "Profile Running";
pub const STOPPED_LINE: &str = "Profile Stopped";
pub const UNKNOWN_PROFILE: &str = "Unknown Profile";

/// Built-in id → name table used when no configuration is supplied.
const BUILTIN_PROFILES: [(&str, &str); 8] = [
    ("1", "Gentle Launch"),
    ("2", "Step Accel"),
    ("3", "Hard Launch"),
    ("4", "Coast Down"),
    ("5", "Brake Step"),
    ("6", "Stop and Go"),
    ("7", "Ramp Up"),
    ("8", "Ramp Down"),
];

// =============================================================================
// Profile Status
// =============================================================================

/// Ordered display lines of the profile panel.
///
/// The empty status is what a cleared layer retains; a derived status always
/// has at least two lines, so the two never compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileStatus {
    lines: Vec<String>,
}

impl ProfileStatus {
    pub const fn new() -> Self { Self { lines: Vec::new() } }

    /// The two-line placeholder shown for stale data.
    pub fn unknown() -> Self { Self::from_lines([UNKNOWN_LINE, UNKNOWN_LINE]) }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    fn push(
        &mut self,
        line: impl Into<String>,
    ) {
        self.lines.push(line.into());
    }

    #[inline]
    pub fn lines(&self) -> &[String] { &self.lines }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.lines.iter().map(String::as_str) }

    #[inline]
    pub fn len(&self) -> usize { self.lines.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

// =============================================================================
// Profile Name Table
// =============================================================================

/// Id → display name table for custom profiles.
///
/// Supplied as configuration; [`ProfileNameTable::builtin`] is the fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileNameTable {
    names: BTreeMap<String, String>,
}

impl ProfileNameTable {
    /// An empty table. Every id falls through to the numeric/opaque labels.
    pub const fn empty() -> Self { Self { names: BTreeMap::new() } }

    /// The built-in table.
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN_PROFILES
                .iter()
                .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Build a table from configuration entries.
    ///
    /// Rejects duplicate ids and blank names.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, OverlayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut names = BTreeMap::new();
        for (id, name) in entries {
            let id = id.into();
            let name = name.into();
            if name.trim().is_empty() {
                return Err(OverlayError::EmptyProfileName(id));
            }
            if names.contains_key(&id) {
                return Err(OverlayError::DuplicateProfileId(id));
            }
            names.insert(id, name);
        }
        Ok(Self { names })
    }

    /// Exact table lookup.
    pub fn get(
        &self,
        id: &str,
    ) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Resolve an id to a label. Never fails.
    ///
    /// Table hit → table name; integer id → `"Profile #<n>"`; anything else →
    /// `"Unknown Profile"`.
    pub fn resolve(
        &self,
        id: &str,
    ) -> String {
        if let Some(name) = self.get(id) {
            return name.to_string();
        }
        match id.parse::<i64>() {
            Ok(n) => format!("Profile #{n}"),
            Err(_) => UNKNOWN_PROFILE.to_string(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.names.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

// =============================================================================
// Deriver
// =============================================================================

/// Maps a telemetry snapshot to the profile panel lines.
#[derive(Clone, Debug, Default)]
pub struct ProfileStatusDeriver {
    names: ProfileNameTable,
}

impl ProfileStatusDeriver {
    pub const fn new(names: ProfileNameTable) -> Self { Self { names } }

    #[inline]
    pub const fn names(&self) -> &ProfileNameTable { &self.names }

    /// Derive the panel lines for one tick.
    ///
    /// The engagement line reads "Engaged" when enabled; when not enabled,
    /// "Disengaged" is emitted only outside custom mode.
    pub fn derive(
        &self,
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    ) -> ProfileStatus {
        // Don't show a profile carried over from before this session
        if snapshot.controls_state.is_stale(started_frame) {
            return ProfileStatus::unknown();
        }

        let cs = &snapshot.controls_state.msg;
        let car = &snapshot.car_state.msg;
        let mut status = ProfileStatus::new();

        if cs.custom_profile_enabled {
            status.push(CUSTOM_MODE_HEADLINE);
            status.push(self.names.resolve(&cs.profile_plan));
        } else {
            status.push(STOCK_MODE_HEADLINE);
            status.push(DISENGAGED_LINE);
        }

        if cs.enabled {
            status.push(ENGAGED_LINE);
        } else if !cs.custom_profile_enabled {
            status.push(DISENGAGED_LINE);
        }

        status.push(if cs.profile_running { RUNNING_LINE } else { STOPPED_LINE });

        let elapsed = cs.profile_current_time - cs.profile_start_time;
        status.push(format!("Plan: {}", cs.profile_plan));
        status.push(format!("Stage: {}", u64::from(cs.profile_stage) + 1));
        status.push(format!("Accel: {:.2}", cs.profile_accel));
        status.push(format!("Elapsed: {elapsed:.2}"));
        status.push(format!("Speed: {:.2}", car.v_ego));
        status.push(format!("Car Accel: {:.2}", car.a_ego));
        status.push(cs.profile_history.clone());

        status
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{CarState, Channel, ControlsState};

    fn scenario_snapshot(controls_frame: u64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            frame: controls_frame,
            controls_state: Channel::new(
                controls_frame,
                ControlsState {
                    custom_profile_enabled: true,
                    enabled: true,
                    profile_running: true,
                    profile_plan: String::from("2"),
                    profile_stage: 0,
                    profile_start_time: 10.0,
                    profile_current_time: 12.5,
                    profile_accel: 1.234,
                    profile_history: String::from("S1 +1.00"),
                    ..ControlsState::default()
                },
            ),
            car_state: Channel::new(
                controls_frame,
                CarState {
                    v_ego: 5.0,
                    a_ego: 1.2,
                    brake_pressed: false,
                },
            ),
        }
    }

    fn deriver() -> ProfileStatusDeriver { ProfileStatusDeriver::new(ProfileNameTable::builtin()) }

    // -------------------------------------------------------------------------
    // Staleness Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_stale_controls_yield_unknown_placeholder() {
        let status = deriver().derive(&scenario_snapshot(99), 100);
        assert_eq!(status, ProfileStatus::from_lines(["Unknown", "Unknown"]));
    }

    #[test]
    fn test_stale_ignores_all_other_fields() {
        let mut snap = scenario_snapshot(10);
        snap.controls_state.msg.custom_profile_enabled = false;
        snap.controls_state.msg.profile_history = String::from("anything");
        snap.car_state.msg.v_ego = 99.0;
        assert_eq!(deriver().derive(&snap, 11), ProfileStatus::unknown());
    }

    #[test]
    fn test_never_received_controls_are_stale() {
        let snap = TelemetrySnapshot::default();
        assert_eq!(deriver().derive(&snap, 1), ProfileStatus::unknown());
    }

    #[test]
    fn test_equal_frame_is_not_stale() {
        let status = deriver().derive(&scenario_snapshot(100), 100);
        assert_ne!(status, ProfileStatus::unknown());
    }

    // -------------------------------------------------------------------------
    // Line Layout Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_scenario_lines() {
        let status = deriver().derive(&scenario_snapshot(100), 100);
        let lines = status.lines();

        assert_eq!(lines[0], "Custom Profile Mode");
        assert_eq!(lines[1], "Step Accel", "Id 2 resolves through the table");
        assert_eq!(lines[2], "Engaged");
        assert_eq!(lines[3], "Profile Running");
        assert_eq!(lines[4], "Plan: 2");
        assert_eq!(lines[5], "Stage: 1", "Stage is shown one-based");
        assert_eq!(lines[6], "Accel: 1.23");
        assert_eq!(lines[7], "Elapsed: 2.50");
        assert_eq!(lines[8], "Speed: 5.00");
        assert_eq!(lines[9], "Car Accel: 1.20");
        assert_eq!(lines[10], "S1 +1.00");
        assert_eq!(status.len(), 11);
    }

    #[test]
    fn test_missing_car_state_renders_zero() {
        let snap = TelemetrySnapshot {
            car_state: Channel::default(),
            ..scenario_snapshot(100)
        };
        let status = deriver().derive(&snap, 100);
        let lines = status.lines();
        assert_eq!(lines[8], "Speed: 0.00");
        assert_eq!(lines[9], "Car Accel: 0.00");
    }

    #[test]
    fn test_stock_mode_headline() {
        let mut snap = scenario_snapshot(100);
        snap.controls_state.msg.custom_profile_enabled = false;
        for enabled in [false, true] {
            snap.controls_state.msg.enabled = enabled;
            let status = deriver().derive(&snap, 100);
            assert_eq!(&status.lines()[..2], ["Stock Mode", "Disengaged"]);
        }
    }

    #[test]
    fn test_engagement_line() {
        let mut snap = scenario_snapshot(100);

        // Custom mode, not enabled: no engagement line at all
        snap.controls_state.msg.enabled = false;
        let status = deriver().derive(&snap, 100);
        assert_eq!(status.lines()[2], "Profile Running");

        // Stock mode, not enabled: "Disengaged" follows the headline
        snap.controls_state.msg.custom_profile_enabled = false;
        let status = deriver().derive(&snap, 100);
        assert_eq!(status.lines()[2], "Disengaged");

        // Stock mode, enabled
        snap.controls_state.msg.enabled = true;
        let status = deriver().derive(&snap, 100);
        assert_eq!(status.lines()[2], "Engaged");
    }

    #[test]
    fn test_stopped_profile() {
        let mut snap = scenario_snapshot(100);
        snap.controls_state.msg.profile_running = false;
        let status = deriver().derive(&snap, 100);
        assert!(status.iter().any(|l| l == "Profile Stopped"));
        assert!(!status.iter().any(|l| l == "Profile Running"));
    }

    #[test]
    fn test_negative_elapsed_is_displayed() {
        let mut snap = scenario_snapshot(100);
        snap.controls_state.msg.profile_start_time = 20.0;
        snap.controls_state.msg.profile_current_time = 18.75;
        let status = deriver().derive(&snap, 100);
        assert!(status.iter().any(|l| l == "Elapsed: -1.25"));
    }

    #[test]
    fn test_history_appended_verbatim() {
        let mut snap = scenario_snapshot(100);
        snap.controls_state.msg.profile_history = String::from("  S1 > S2\tdone ");
        let status = deriver().derive(&snap, 100);
        assert_eq!(status.lines().last().map(String::as_str), Some("  S1 > S2\tdone "));
    }

    #[test]
    fn test_derive_is_idempotent() {
        let d = deriver();
        let snap = scenario_snapshot(100);
        assert_eq!(d.derive(&snap, 100), d.derive(&snap, 100));
    }

    #[test]
    fn test_empty_never_equals_derived() {
        let d = deriver();
        assert_ne!(ProfileStatus::new(), d.derive(&scenario_snapshot(100), 100));
        assert_ne!(ProfileStatus::new(), d.derive(&scenario_snapshot(1), 100));
    }

    // -------------------------------------------------------------------------
    // Name Lookup Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_table_hits() {
        let table = ProfileNameTable::builtin();
        for (id, name) in BUILTIN_PROFILES {
            assert_eq!(table.resolve(id), name);
        }
    }

    #[test]
    fn test_resolve_numeric_fallback() {
        let table = ProfileNameTable::builtin();
        assert_eq!(table.resolve("42"), "Profile #42");
        assert_eq!(table.resolve("-3"), "Profile #-3");
        assert_eq!(table.resolve("007"), "Profile #7", "Label uses the parsed integer");
    }

    #[test]
    fn test_resolve_opaque_fallback() {
        let table = ProfileNameTable::builtin();
        for id in ["", "abc", "2.5", " 2", "99999999999999999999999"] {
            assert_eq!(table.resolve(id), "Unknown Profile", "id {id:?}");
        }
    }

    #[test]
    fn test_injected_table_overrides_builtin() {
        let table = ProfileNameTable::from_entries([("2", "Track Day")]).unwrap();
        assert_eq!(table.resolve("2"), "Track Day");
        assert_eq!(table.resolve("1"), "Profile #1");
    }

    #[test]
    fn test_table_rejects_duplicates_and_blank_names() {
        assert_eq!(
            ProfileNameTable::from_entries([("1", "A"), ("1", "B")]),
            Err(OverlayError::DuplicateProfileId(String::from("1")))
        );
        assert_eq!(
            ProfileNameTable::from_entries([("3", "  ")]),
            Err(OverlayError::EmptyProfileName(String::from("3")))
        );
    }

    #[test]
    fn test_empty_table_still_labels_everything() {
        let d = ProfileStatusDeriver::new(ProfileNameTable::empty());
        let status = d.derive(&scenario_snapshot(100), 100);
        assert_eq!(status.lines()[1], "Profile #2");
    }
}

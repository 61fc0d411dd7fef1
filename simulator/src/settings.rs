//! Simulator configuration file.
//!
//! ```toml
//! [feed]
//! tick_hz = 20
//!
//! [display]
//! scale = 2
//!
//! [profiles]
//! "1" = "Gentle Launch"
//! "2" = "Step Accel"
//!
//! [[plans]]
//! id = "2"
//! stages = [[1.0, 3.0], [0.0, 2.0], [-1.0, 3.0]]
//! ```
//!
//! Every section is optional. An empty `[profiles]` table means the built-in
//! name table; no `[[plans]]` means the built-in demo plans.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use overlay_common::config::UI_FREQ;
use overlay_common::profile_control::{DEFAULT_V_EGO_STOPPING, PlanStage, ProfileControl};
use overlay_common::{OverlayError, ProfileNameTable};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedSettings {
    /// Telemetry ticks per second.
    pub tick_hz: u32,
}

impl Default for FeedSettings {
    fn default() -> Self { Self { tick_hz: UI_FREQ as u32 } }
}

/// Allowed window pixel scales.
pub const SCALE_RANGE: core::ops::RangeInclusive<u32> = 1..=8;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Window pixel scale.
    pub scale: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self { Self { scale: 2 } }
}

/// A named profile plan: `(accel m/s², duration s)` pairs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlanSettings {
    pub id: String,
    pub stages: Vec<(f32, f32)>,
}

impl PlanSettings {
    pub fn plan_stages(&self) -> Vec<PlanStage> {
        self.stages
            .iter()
            .map(|&(accel, duration)| PlanStage::new(accel, duration))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub feed: FeedSettings,
    pub display: DisplaySettings,
    pub profiles: BTreeMap<String, String>,
    pub plans: Vec<PlanSettings>,
}

impl Settings {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let settings = Self::parse(&raw).with_context(|| format!("loading config {}", path.display()))?;
        Ok(settings)
    }

    /// Parse and validate a TOML document.
    pub fn parse(raw: &str) -> Result<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.feed.tick_hz == 0 {
            bail!("feed.tick_hz must be positive");
        }
        if !SCALE_RANGE.contains(&self.display.scale) {
            bail!(
                "display.scale must be between {} and {}, got {}",
                SCALE_RANGE.start(),
                SCALE_RANGE.end(),
                self.display.scale
            );
        }
        self.name_table()?;
        let mut seen = BTreeSet::new();
        for plan in &self.plans {
            if !seen.insert(plan.id.as_str()) {
                bail!("plan id {:?} defined twice", plan.id);
            }
            ProfileControl::new(&plan.plan_stages(), DEFAULT_V_EGO_STOPPING)
                .with_context(|| format!("plan {:?}", plan.id))?;
        }
        Ok(())
    }

    /// Profile name table from `[profiles]`, or the built-in one.
    pub fn name_table(&self) -> Result<ProfileNameTable, OverlayError> {
        if self.profiles.is_empty() {
            return Ok(ProfileNameTable::builtin());
        }
        ProfileNameTable::from_entries(self.profiles.iter().map(|(id, name)| (id.as_str(), name.as_str())))
    }

    /// Configured plans, or the built-in demo plans.
    pub fn plans(&self) -> Vec<PlanSettings> {
        if self.plans.is_empty() { default_plans() } else { self.plans.clone() }
    }
}

fn default_plans() -> Vec<PlanSettings> {
    vec![
        PlanSettings {
            id: String::from("1"),
            stages: vec![(0.5, 4.0), (1.0, 4.0), (0.0, 4.0)],
        },
        PlanSettings {
            id: String::from("2"),
            stages: vec![(1.0, 3.0), (0.0, 2.0), (-1.0, 3.0)],
        },
        PlanSettings {
            id: String::from("3"),
            stages: vec![(2.0, 2.0), (-2.0, 2.0)],
        },
        PlanSettings {
            id: String::from("42"),
            stages: vec![(0.3, 5.0)],
        },
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let s = Settings::load(None).unwrap();
        assert_eq!(s.feed.tick_hz, UI_FREQ as u32);
        assert_eq!(s.display.scale, 2);
        assert_eq!(s.name_table().unwrap(), ProfileNameTable::builtin());
        assert!(!s.plans().is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        let s = Settings::parse(
            r#"
            [feed]
            tick_hz = 10

            [profiles]
            "7" = "Track Day"

            [[plans]]
            id = "7"
            stages = [[1.5, 2.0], [0.0, 1.0]]
            "#,
        )
        .unwrap();
        assert_eq!(s.feed.tick_hz, 10);
        assert_eq!(s.display.scale, 2, "Missing sections fall back to defaults");

        let table = s.name_table().unwrap();
        assert_eq!(table.get("7"), Some("Track Day"));
        assert_eq!(table.resolve("2"), "Profile #2", "Configured table replaces the built-in one");

        let plans = s.plans();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].plan_stages(), vec![PlanStage::new(1.5, 2.0), PlanStage::new(0.0, 1.0)]);
    }

    #[test]
    fn test_blank_profile_name_rejected() {
        let err = Settings::parse("[profiles]\n\"1\" = \"  \"\n").unwrap_err();
        assert!(format!("{err:#}").contains("empty display name"));
    }

    #[test]
    fn test_empty_plan_rejected() {
        let err = Settings::parse("[[plans]]\nid = \"1\"\nstages = []\n").unwrap_err();
        assert!(format!("{err:#}").contains("plan \"1\""));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = Settings::parse("[[plans]]\nid = \"5\"\nstages = [[1.0, -2.0]]\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid duration"));
    }

    #[test]
    fn test_duplicate_plan_rejected() {
        let doc = "[[plans]]\nid = \"1\"\nstages = [[1.0, 1.0]]\n[[plans]]\nid = \"1\"\nstages = [[2.0, 1.0]]\n";
        assert!(Settings::parse(doc).is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        assert!(Settings::parse("[feed]\ntick_hz = 0\n").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Settings::load(Some(Path::new("/nonexistent/overlay.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/overlay.toml"));
    }
}

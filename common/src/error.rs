//! Error type for overlay configuration.
//!
//! Derivation never fails; only building a name table or a profile plan can.

use alloc::string::String;

use thiserror::Error;

/// Configuration errors raised while building overlay inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OverlayError {
    /// A profile plan needs at least one stage.
    #[error("profile plan must have at least one stage")]
    EmptyPlan,

    /// Stage durations must be finite and non-negative.
    #[error("stage {index} has invalid duration {duration}")]
    InvalidStageDuration { index: usize, duration: f32 },

    /// The same id appeared twice in a profile name table.
    #[error("duplicate profile id `{0}` in name table")]
    DuplicateProfileId(String),

    /// A profile name table entry had no display name.
    #[error("profile `{0}` has an empty display name")]
    EmptyProfileName(String),
}

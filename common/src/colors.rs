//! Color constants for the onroad overlay.
//!
//! Standard colors come from the `RgbColor` trait constants. The status palette
//! is converted by hand from 8-bit RGB to Rgb565 (5 bits red, 6 bits green,
//! 5 bits blue) so every constant stays `const`.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::telemetry::DrivingStatus;

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black (0, 0, 0). Used for text on light alert backgrounds.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Used for text on dark backgrounds.
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Overlay Colors
// =============================================================================

/// Dark gray standing in for the camera picture behind the HUD.
pub const CAMERA_BACKDROP: Rgb565 = Rgb565::new(3, 6, 3);

/// Near-black profile panel background (0x15, 0x15, 0x15).
pub const PANEL_BG: Rgb565 = Rgb565::new(2, 5, 2);

/// Muted gray for secondary panel text.
pub const DETAIL_TEXT: Rgb565 = Rgb565::new(22, 44, 22);

/// Alert background for normal-priority alerts (0x15, 0x15, 0x15).
pub const ALERT_NORMAL_BG: Rgb565 = Rgb565::new(2, 5, 2);

/// Alert background for user prompts (0xDA, 0x6F, 0x25).
pub const ALERT_PROMPT_BG: Rgb565 = Rgb565::new(27, 27, 4);

/// Alert background for critical alerts (0xC9, 0x22, 0x31).
pub const ALERT_CRITICAL_BG: Rgb565 = Rgb565::new(25, 8, 6);

// =============================================================================
// Border Palette
// =============================================================================

/// Border while disengaged (0x17, 0x33, 0x49).
pub const BORDER_DISENGAGED: Rgb565 = Rgb565::new(2, 12, 9);

/// Border while engaged (0x17, 0x86, 0x44).
pub const BORDER_ENGAGED: Rgb565 = Rgb565::new(2, 33, 8);

/// Border while a user prompt is shown (0xDA, 0x6F, 0x25).
pub const BORDER_WARNING: Rgb565 = Rgb565::new(27, 27, 4);

/// Border while a critical alert is shown (0xC9, 0x22, 0x31).
pub const BORDER_CRITICAL: Rgb565 = Rgb565::new(25, 8, 6);

/// The single active border color.
///
/// Compared by value; the compositor gates window repaints on it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BorderColor(pub Rgb565);

impl BorderColor {
    /// Palette lookup for a driving status.
    pub const fn for_status(status: DrivingStatus) -> Self {
        match status {
            DrivingStatus::Disengaged => Self(BORDER_DISENGAGED),
            DrivingStatus::Engaged => Self(BORDER_ENGAGED),
            DrivingStatus::Warning => Self(BORDER_WARNING),
            DrivingStatus::Critical => Self(BORDER_CRITICAL),
        }
    }

    #[inline]
    pub const fn rgb(self) -> Rgb565 { self.0 }
}

impl Default for BorderColor {
    fn default() -> Self { Self::for_status(DrivingStatus::Disengaged) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let all = [
            BorderColor::for_status(DrivingStatus::Disengaged),
            BorderColor::for_status(DrivingStatus::Engaged),
            BorderColor::for_status(DrivingStatus::Warning),
            BorderColor::for_status(DrivingStatus::Critical),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b, "Each status needs its own border color");
            }
        }
    }

    #[test]
    fn test_default_border_is_disengaged() {
        assert_eq!(BorderColor::default().rgb(), BORDER_DISENGAGED);
    }
}

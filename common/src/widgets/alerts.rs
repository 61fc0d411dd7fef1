//! Alert bands.
//!
//! Small and mid alerts sit in a band at the bottom of the camera view; a
//! full-size alert covers the whole camera view. With no alert the band is
//! reset to the camera backdrop.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;

use super::primitives::{CAMERA_AREA, fill_area};
use crate::colors::{ALERT_CRITICAL_BG, ALERT_NORMAL_BG, ALERT_PROMPT_BG, BLACK, CAMERA_BACKDROP, WHITE};
use crate::config::{ALERT_BAND_Y, ALERT_MID_HEIGHT, ALERT_SMALL_HEIGHT, BORDER_SIZE, CENTER_X, CENTER_Y, SCREEN_HEIGHT};
use crate::styles::{ALERT_FONT, CENTERED};
use crate::telemetry::{Alert, AlertSize, AlertStatus};

const BAND_X: i32 = BORDER_SIZE as i32;
const BAND_WIDTH: u32 = CAMERA_AREA.size.width;
const BAND_BOTTOM: i32 = (SCREEN_HEIGHT - BORDER_SIZE) as i32;

/// Region owned by small and mid alerts.
pub const ALERT_BAND: Rectangle = Rectangle::new(Point::new(BAND_X, ALERT_BAND_Y), Size::new(BAND_WIDTH, ALERT_MID_HEIGHT));

const SMALL_ALERT: Rectangle = Rectangle::new(
    Point::new(BAND_X, BAND_BOTTOM - ALERT_SMALL_HEIGHT as i32),
    Size::new(BAND_WIDTH, ALERT_SMALL_HEIGHT),
);

const SMALL_TEXT_POS: Point = Point::new(CENTER_X, BAND_BOTTOM - ALERT_SMALL_HEIGHT as i32 / 2 + 6);
const MID_TEXT1_POS: Point = Point::new(CENTER_X, ALERT_BAND_Y + 28);
const MID_TEXT2_POS: Point = Point::new(CENTER_X, ALERT_BAND_Y + 50);
const FULL_TEXT1_POS: Point = Point::new(CENTER_X, CENTER_Y);
const FULL_TEXT2_POS: Point = Point::new(CENTER_X, CENTER_Y + 30);

/// Background and text color for an alert priority.
pub const fn alert_colors(status: AlertStatus) -> (Rgb565, Rgb565) {
    match status {
        AlertStatus::Normal => (ALERT_NORMAL_BG, WHITE),
        AlertStatus::UserPrompt => (ALERT_PROMPT_BG, BLACK),
        AlertStatus::Critical => (ALERT_CRITICAL_BG, WHITE),
    }
}

/// Paint `alert` into its region.
pub fn draw_alert<D>(
    display: &mut D,
    alert: &Alert,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let (bg, fg) = alert_colors(alert.status);
    let text_style = MonoTextStyle::new(ALERT_FONT, fg);

    match alert.size {
        AlertSize::None => fill_area(display, ALERT_BAND, CAMERA_BACKDROP),
        AlertSize::Small => {
            fill_area(display, ALERT_BAND, CAMERA_BACKDROP);
            fill_area(display, SMALL_ALERT, bg);
            Text::with_text_style(&alert.text1, SMALL_TEXT_POS, text_style, CENTERED)
                .draw(display)
                .ok();
        }
        AlertSize::Mid => {
            fill_area(display, ALERT_BAND, bg);
            Text::with_text_style(&alert.text1, MID_TEXT1_POS, text_style, CENTERED)
                .draw(display)
                .ok();
            Text::with_text_style(&alert.text2, MID_TEXT2_POS, text_style, CENTERED)
                .draw(display)
                .ok();
        }
        AlertSize::Full => {
            fill_area(display, CAMERA_AREA, bg);
            Text::with_text_style(&alert.text1, FULL_TEXT1_POS, text_style, CENTERED)
                .draw(display)
                .ok();
            Text::with_text_style(&alert.text2, FULL_TEXT2_POS, text_style, CENTERED)
                .draw(display)
                .ok();
        }
    }
}

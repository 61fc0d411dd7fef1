//! Pre-computed static text styles.
//!
//! All styles are `const` so no style object is built during a paint pass.
//! Alert text color depends on the alert background, so [`ALERT_FONT`] is
//! exposed for `MonoTextStyle::new(ALERT_FONT, color)`.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_24_POINT;

use crate::colors::{DETAIL_TEXT, WHITE};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered text. Used for the speed HUD and alert text.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Left-aligned text with a top baseline. Used for panel and debug lines.
pub const LEFT_TOP: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Font References
// =============================================================================

/// Alert font (10x20 pixels).
pub const ALERT_FONT: &MonoFont = &FONT_10X20;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// Small white text. Panel headline and HUD unit label.
pub const LABEL_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);

/// Small gray text for secondary panel lines.
pub const DETAIL_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, DETAIL_TEXT);

/// Medium white text for titles on the debug page (10x20 pixels).
pub const TITLE_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, WHITE);

/// Large white text for the speed readout (`ProFont` 24pt).
pub const SPEED_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_24_POINT, WHITE);

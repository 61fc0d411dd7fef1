//! Low-level drawing primitives shared across widgets.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{BORDER_ENGAGED, CAMERA_BACKDROP, DETAIL_TEXT, PANEL_BG};
use crate::config::{
    BORDER_SIZE,
    CENTER_X,
    HUD_SPEED_Y,
    HUD_UNIT_Y,
    PANEL_HEIGHT,
    PANEL_LINE_HEIGHT,
    PANEL_MAX_LINES,
    PANEL_PADDING,
    PANEL_RADIUS,
    PANEL_WIDTH,
    PANEL_X,
    PANEL_Y,
    SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::layers::CameraHud;
use crate::profile::ProfileStatus;
use crate::styles::{CENTERED, DETAIL_STYLE, LABEL_STYLE_WHITE, LEFT_TOP, SPEED_STYLE};

/// Camera view inside the border.
pub const CAMERA_AREA: Rectangle = Rectangle::new(
    Point::new(BORDER_SIZE as i32, BORDER_SIZE as i32),
    Size::new(SCREEN_WIDTH - 2 * BORDER_SIZE, SCREEN_HEIGHT - 2 * BORDER_SIZE),
);

const SCREEN_AREA: Rectangle = Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));

/// Characters per panel line (6 px font).
pub const PANEL_LINE_CHARS: usize = (PANEL_WIDTH as usize - 2 * PANEL_PADDING as usize) / 6;

/// Panel lines drawn in the white headline style; the rest use the detail style.
const PANEL_HEADLINE_LINES: usize = 2;

const ENGAGED_MARK_CENTER: Point = Point::new(BORDER_SIZE as i32 + 20, BORDER_SIZE as i32 + 20);
const ENGAGED_MARK_DIAMETER: u32 = 20;

/// Cut `line` to at most `max` characters.
pub fn clip_chars(
    line: &str,
    max: usize,
) -> &str {
    match line.char_indices().nth(max) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Fill a rectangle with a solid color.
pub fn fill_area<D>(
    display: &mut D,
    area: Rectangle,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(PrimitiveStyle::with_fill(color)).draw(display).ok();
}

/// Draw the window border, `BORDER_SIZE` wide, inside the screen edge.
pub fn draw_border<D>(
    display: &mut D,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(color)
        .stroke_width(BORDER_SIZE)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    SCREEN_AREA.into_styled(style).draw(display).ok();
}

/// Paint the camera backdrop with the speed HUD and engagement mark.
pub fn draw_camera<D>(
    display: &mut D,
    hud: &CameraHud,
) where
    D: DrawTarget<Color = Rgb565>,
{
    fill_area(display, CAMERA_AREA, CAMERA_BACKDROP);

    let mut speed: String<8> = String::new();
    match hud.speed_kph {
        Some(kph) => {
            write!(speed, "{kph}").ok();
        }
        None => {
            speed.push_str("--").ok();
        }
    }
    Text::with_text_style(&speed, Point::new(CENTER_X, HUD_SPEED_Y), SPEED_STYLE, CENTERED)
        .draw(display)
        .ok();
    Text::with_text_style("km/h", Point::new(CENTER_X, HUD_UNIT_Y), LABEL_STYLE_WHITE, CENTERED)
        .draw(display)
        .ok();

    let mark_style = if hud.engaged {
        PrimitiveStyle::with_fill(BORDER_ENGAGED)
    } else {
        PrimitiveStyle::with_stroke(DETAIL_TEXT, 2)
    };
    Circle::with_center(ENGAGED_MARK_CENTER, ENGAGED_MARK_DIAMETER)
        .into_styled(mark_style)
        .draw(display)
        .ok();
}

/// Paint the profile panel. Lines past the panel height are not drawn.
pub fn draw_profile_panel<D>(
    display: &mut D,
    status: &ProfileStatus,
) where
    D: DrawTarget<Color = Rgb565>,
{
    RoundedRectangle::with_equal_corners(
        Rectangle::new(Point::new(PANEL_X, PANEL_Y), Size::new(PANEL_WIDTH, PANEL_HEIGHT)),
        Size::new(PANEL_RADIUS, PANEL_RADIUS),
    )
    .into_styled(PrimitiveStyle::with_fill(PANEL_BG))
    .draw(display)
    .ok();

    for (i, line) in status.iter().take(PANEL_MAX_LINES).enumerate() {
        let style = if i < PANEL_HEADLINE_LINES { LABEL_STYLE_WHITE } else { DETAIL_STYLE };
        let pos = Point::new(PANEL_X + PANEL_PADDING, PANEL_Y + PANEL_PADDING + i as i32 * PANEL_LINE_HEIGHT);
        Text::with_text_style(clip_chars(line, PANEL_LINE_CHARS), pos, style, LEFT_TOP)
            .draw(display)
            .ok();
    }
}

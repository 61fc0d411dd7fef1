//! Debug page: frame timing, redraw counters, session state and event log.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use overlay_common::OverlayCompositor;
use overlay_common::colors::{BLACK, WHITE};
use overlay_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use overlay_common::event_log::EventLog;
use overlay_common::render::layer_idx;
use overlay_common::styles::{ALERT_FONT, LABEL_STYLE_WHITE, TITLE_STYLE_WHITE};

use crate::feed::TelemetryFeed;
use crate::profiling::ProfilingMetrics;

const HEADER_Y: i32 = 18;
const HEADER_DIVIDER_Y: i32 = 26;
const SECTION_HEADER_Y: i32 = 40;
const STATS_Y: i32 = 54;
const LOG_DIVIDER_Y: i32 = 170;
const LOG_Y: i32 = 184;
const LOG_LINE_HEIGHT: i32 = 14;
const COL1_X: i32 = 6;
const COL2_X: i32 = 166;
const COL3_X: i32 = 326;
const STAT_LINE_HEIGHT: i32 = 14;

const SECTION_COLOR: Rgb565 = Rgb565::new(16, 32, 16);
const HIGHLIGHT_COLOR: Rgb565 = Rgb565::YELLOW;
const LOG_PROMPT_COLOR: Rgb565 = Rgb565::GREEN;
const LOG_TEXT_COLOR: Rgb565 = Rgb565::new(31, 41, 0);
const LOG_BG: Rgb565 = Rgb565::new(1, 2, 1);

/// Draw the whole debug page.
pub fn draw_debug_page<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
    compositor: &OverlayCompositor,
    feed: &TelemetryFeed,
    log: &EventLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();
    draw_header(display, metrics);
    draw_horizontal_line(display, HEADER_DIVIDER_Y);
    draw_section_headers(display);
    draw_timing_column(display, metrics);
    draw_render_column(display, metrics);
    draw_session_column(display, compositor, feed);
    draw_horizontal_line(display, LOG_DIVIDER_Y);
    draw_log_terminal(display, log);
}

fn draw_header<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Text::new("DEBUG VIEW", Point::new(COL1_X, HEADER_Y), TITLE_STYLE_WHITE)
        .draw(display)
        .ok();

    let mut s: String<24> = String::new();
    let _ = write!(s, "UP {}", metrics.uptime_string());
    Text::new(&s, Point::new(COL2_X, HEADER_Y), LABEL_STYLE_WHITE)
        .draw(display)
        .ok();
}

fn draw_section_headers<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(ALERT_FONT, SECTION_COLOR);
    for (label, x) in [("TIMING", COL1_X), ("REDRAWS", COL2_X), ("SESSION", COL3_X)] {
        Text::new(label, Point::new(x, SECTION_HEADER_Y), style).draw(display).ok();
    }
}

/// Draw `lines` as a column starting at `x`; the last `highlighted` lines use
/// the highlight color.
fn draw_column<D>(
    display: &mut D,
    x: i32,
    lines: &[String<24>],
    highlighted: usize,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let highlight_style = MonoTextStyle::new(&FONT_6X10, HIGHLIGHT_COLOR);
    let first_highlight = lines.len().saturating_sub(highlighted);
    let mut y = STATS_Y;
    for (i, line) in lines.iter().enumerate() {
        let style = if i >= first_highlight { highlight_style } else { LABEL_STYLE_WHITE };
        Text::new(line, Point::new(x, y), style).draw(display).ok();
        y += STAT_LINE_HEIGHT;
    }
}

fn line(args: core::fmt::Arguments<'_>) -> String<24> {
    let mut s = String::new();
    let _ = s.write_fmt(args);
    s
}

fn draw_timing_column<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let min_ms = if metrics.frame_time_min_us == u32::MAX {
        0.0
    } else {
        metrics.frame_time_min_us as f32 / 1000.0
    };
    let lines = [
        line(format_args!("Frame:  {:.1}ms", metrics.frame_time_us as f32 / 1000.0)),
        line(format_args!("Render: {:.1}ms", metrics.render_time_us as f32 / 1000.0)),
        line(format_args!("Sleep:  {:.1}ms", metrics.sleep_time_us as f32 / 1000.0)),
        line(format_args!("Min:    {min_ms:.1}ms")),
        line(format_args!("Max:    {:.1}ms", metrics.frame_time_max_us as f32 / 1000.0)),
        line(format_args!("Avg:    {:.1}ms", metrics.frame_time_avg_us() as f32 / 1000.0)),
    ];
    draw_column(display, COL1_X, &lines, 3);
}

fn draw_render_column<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let lines = [
        line(format_args!("Ticks:   {}", metrics.ticks)),
        line(format_args!("Paints:  {}", metrics.paint_passes)),
        line(format_args!("Border:  {}", metrics.border_redraws)),
        line(format_args!("Camera:  {}", metrics.layer_redraws[layer_idx::CAMERA])),
        line(format_args!("Alerts:  {}", metrics.layer_redraws[layer_idx::ALERTS])),
        line(format_args!("Profile: {}", metrics.layer_redraws[layer_idx::PROFILE])),
        line(format_args!("Ratio:   {:.1}%", metrics.paint_ratio())),
    ];
    draw_column(display, COL2_X, &lines, 1);
}

fn draw_session_column<D>(
    display: &mut D,
    compositor: &OverlayCompositor,
    feed: &TelemetryFeed,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let on_off = |b: bool| if b { "on" } else { "off" };
    let lines = [
        line(format_args!("Onroad:  {}", on_off(compositor.is_started()))),
        line(format_args!("Engaged: {}", on_off(feed.is_enabled()))),
        line(format_args!("Mode:    {}", if feed.is_custom() { "custom" } else { "stock" })),
        line(format_args!("Plan:    {}", feed.plan_id())),
        line(format_args!("Running: {}", on_off(feed.is_profile_running()))),
        line(format_args!("Stalled: {}", on_off(feed.is_stalled()))),
        line(format_args!("Status:  {:?}", compositor.driving_status())),
    ];
    draw_column(display, COL3_X, &lines, 1);
}

fn draw_log_terminal<D>(
    display: &mut D,
    log: &EventLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let prompt_style = MonoTextStyle::new(&FONT_6X10, LOG_PROMPT_COLOR);
    let text_style = MonoTextStyle::new(&FONT_6X10, LOG_TEXT_COLOR);

    Rectangle::new(
        Point::new(0, LOG_DIVIDER_Y + 2),
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT - LOG_DIVIDER_Y as u32 - 2),
    )
    .into_styled(PrimitiveStyle::with_fill(LOG_BG))
    .draw(display)
    .ok();

    let mut y = LOG_Y;
    for entry in log.iter() {
        Text::new(">", Point::new(COL1_X, y), prompt_style).draw(display).ok();
        Text::new(entry, Point::new(COL1_X + 10, y), text_style)
            .draw(display)
            .ok();
        y += LOG_LINE_HEIGHT;
    }

    Text::new("> _", Point::new(COL1_X, y), prompt_style).draw(display).ok();
}

fn draw_horizontal_line<D>(
    display: &mut D,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(Point::new(2, y), Point::new(SCREEN_WIDTH as i32 - 2, y))
        .into_styled(PrimitiveStyle::with_stroke(WHITE, 1))
        .draw(display)
        .ok();
}

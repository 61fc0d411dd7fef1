//! Layout and session configuration constants.
//!
//! Layout values are computed at compile time so the paint routines never
//! recompute positions per frame. Frame-based timeouts assume the feed rate in
//! [`UI_FREQ`].

// =============================================================================
// Display Configuration
// =============================================================================

/// Overlay width in pixels.
pub const SCREEN_WIDTH: u32 = 480;

/// Overlay height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

/// Width of the status-colored border around the camera view.
pub const BORDER_SIZE: u32 = 8;

// =============================================================================
// Camera HUD Layout
// =============================================================================

/// Height of the speed readout band at the top of the camera view.
pub const HUD_HEIGHT: u32 = 44;

/// Speed value position (centered horizontally).
pub const HUD_SPEED_Y: i32 = (BORDER_SIZE + 30) as i32;

/// Unit label position below the speed value.
pub const HUD_UNIT_Y: i32 = (BORDER_SIZE + HUD_HEIGHT + 4) as i32;

// =============================================================================
// Profile Panel Layout
// =============================================================================

/// Profile panel width.
pub const PANEL_WIDTH: u32 = 190;

/// Profile panel height.
pub const PANEL_HEIGHT: u32 = 176;

/// Gap between the panel and the right border.
pub const PANEL_MARGIN: u32 = 16;

/// Corner radius of the profile panel.
pub const PANEL_RADIUS: u32 = 10;

/// Panel top-left X (center-right of the screen).
pub const PANEL_X: i32 = (SCREEN_WIDTH - BORDER_SIZE - PANEL_MARGIN - PANEL_WIDTH) as i32;

/// Panel top-left Y (vertically centered).
pub const PANEL_Y: i32 = ((SCREEN_HEIGHT - PANEL_HEIGHT) / 2) as i32;

/// Inner padding of the panel text.
pub const PANEL_PADDING: i32 = 8;

/// Vertical distance between panel text lines.
pub const PANEL_LINE_HEIGHT: i32 = 12;

/// Lines that fit inside the panel; later lines are not painted.
pub const PANEL_MAX_LINES: usize = ((PANEL_HEIGHT as i32 - 2 * PANEL_PADDING) / PANEL_LINE_HEIGHT) as usize;

// =============================================================================
// Alert Layout
// =============================================================================

/// Height of a mid-size alert band.
pub const ALERT_MID_HEIGHT: u32 = 64;

/// Height of a small alert band.
pub const ALERT_SMALL_HEIGHT: u32 = 36;

/// Region reserved for alerts at the bottom of the camera view.
/// Full-screen alerts cover the whole camera area instead.
pub const ALERT_BAND_Y: i32 = (SCREEN_HEIGHT - BORDER_SIZE - ALERT_MID_HEIGHT) as i32;

/// Screen center X coordinate.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Screen center Y coordinate.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

const _: () = assert!(PANEL_HEIGHT + 2 * BORDER_SIZE < SCREEN_HEIGHT);
const _: () = assert!(ALERT_SMALL_HEIGHT < ALERT_MID_HEIGHT);
const _: () = assert!(PANEL_MAX_LINES >= 2);

// =============================================================================
// Session Timing (frame based)
// =============================================================================

/// Nominal telemetry feed rate in ticks per second.
pub const UI_FREQ: u64 = 20;

/// Ticks after session start before missing controls raise an alert.
pub const STARTUP_GRACE_FRAMES: u64 = 5 * UI_FREQ;

/// Ticks without a `controlsState` update before controls are unresponsive.
pub const CONTROLS_TIMEOUT_FRAMES: u64 = 5 * UI_FREQ;

/// Window after a timeout during which the take-control alert is shown.
pub const TAKE_CONTROL_WINDOW_FRAMES: u64 = 10 * UI_FREQ;

/// Meters per second to kilometers per hour.
pub const MS_TO_KPH: f32 = 3.6;

//! `embedded-graphics` rendering of the overlay.
//!
//! [`DisplaySink`] implements [`RenderSink`] for any
//! `DrawTarget<Color = Rgb565>`, so the same paint pass drives the desktop
//! simulator window and an embedded panel.

mod alerts;
mod primitives;

pub use alerts::{ALERT_BAND, alert_colors, draw_alert};
pub use primitives::{CAMERA_AREA, PANEL_LINE_CHARS, clip_chars, draw_border, draw_camera, draw_profile_panel, fill_area};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::BorderColor;
use crate::layers::CameraHud;
use crate::profile::ProfileStatus;
use crate::render::RenderSink;
use crate::telemetry::{Alert, AlertSize};

/// Render sink drawing into an owned display.
///
/// A full-size alert covers the camera layer, so the sink keeps the last HUD
/// it painted and restores it when the alert shrinks or goes away.
pub struct DisplaySink<D> {
    display: D,
    last_hud: CameraHud,
    full_alert_shown: bool,
}

impl<D> DisplaySink<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            last_hud: CameraHud::default(),
            full_alert_shown: false,
        }
    }

    #[inline]
    pub const fn display(&self) -> &D { &self.display }

    #[inline]
    pub fn display_mut(&mut self) -> &mut D { &mut self.display }

    pub fn into_inner(self) -> D { self.display }
}

impl<D> RenderSink for DisplaySink<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn paint_border(
        &mut self,
        color: BorderColor,
    ) {
        draw_border(&mut self.display, color.rgb());
    }

    fn paint_camera(
        &mut self,
        hud: &CameraHud,
    ) {
        self.last_hud = *hud;
        draw_camera(&mut self.display, hud);
    }

    fn paint_alert(
        &mut self,
        alert: &Alert,
    ) {
        let full = alert.size == AlertSize::Full;
        if self.full_alert_shown && !full {
            draw_camera(&mut self.display, &self.last_hud);
        }
        self.full_alert_shown = full;
        draw_alert(&mut self.display, alert);
    }

    fn paint_profile(
        &mut self,
        status: &ProfileStatus,
    ) {
        draw_profile_panel(&mut self.display, status);
    }
}

// =============================================================================
// Tests
// =============================================================================

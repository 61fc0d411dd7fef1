//! Camera base layer.
//!
//! The camera picture itself comes from an external video widget. This layer
//! owns the HUD drawn on top of it: the displayed speed and the engagement
//! state. Speed is gated on its rounded km/h value, matching what is printed,
//! so sub-unit jitter in `v_ego` does not cause redraws.

use log::trace;

use super::{LayerKind, OverlayLayer};
use crate::change_gate::ChangeGate;
use crate::config::MS_TO_KPH;
use crate::render::RenderSink;
use crate::telemetry::TelemetrySnapshot;

/// Gated state of the camera HUD.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CameraHud {
    /// Displayed speed in km/h. `None` while `carState` is stale.
    pub speed_kph: Option<u16>,
    pub engaged: bool,
}

impl CameraHud {
    /// HUD state for one tick.
    pub fn derive(
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    ) -> Self {
        let speed_kph = if snapshot.car_state.is_stale(started_frame) {
            None
        } else {
            let kph = micromath::F32(snapshot.car_state.msg.v_ego.max(0.0) * MS_TO_KPH).round().0;
            Some(kph.min(f32::from(u16::MAX)) as u16)
        };
        Self {
            speed_kph,
            engaged: snapshot.is_engaged(started_frame),
        }
    }
}

/// Bottom layer of the stack. The only layer that accepts input.
#[derive(Debug)]
pub struct CameraLayer {
    hud: ChangeGate<CameraHud>,
    dirty: bool,
}

impl CameraLayer {
    pub fn new() -> Self {
        Self {
            hud: ChangeGate::new(),
            dirty: true,
        }
    }

    #[inline]
    pub const fn hud(&self) -> &CameraHud { self.hud.current() }
}

impl Default for CameraLayer {
    fn default() -> Self { Self::new() }
}

impl OverlayLayer for CameraLayer {
    fn kind(&self) -> LayerKind { LayerKind::Camera }

    fn update_state(
        &mut self,
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    ) {
        if self.hud.compare_and_swap(CameraHud::derive(snapshot, started_frame)) {
            trace!("camera hud changed: {:?}", self.hud.current());
            self.dirty = true;
        }
    }

    fn clear(&mut self) {
        self.hud.reset();
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool { self.dirty }

    fn take_dirty(&mut self) -> bool { core::mem::take(&mut self.dirty) }

    fn paint(
        &self,
        sink: &mut dyn RenderSink,
    ) {
        sink.paint_camera(self.hud.current());
    }

    fn accepts_input(&self) -> bool { true }
}

//! Alert layer.
//!
//! Shows the alert derived by [`Alert::derive`]. Transparent to input.

use log::trace;

use super::{LayerKind, OverlayLayer};
use crate::change_gate::ChangeGate;
use crate::render::RenderSink;
use crate::telemetry::{Alert, TelemetrySnapshot};

#[derive(Debug)]
pub struct AlertLayer {
    alert: ChangeGate<Alert>,
    dirty: bool,
}

impl AlertLayer {
    pub fn new() -> Self {
        Self {
            alert: ChangeGate::new(),
            dirty: true,
        }
    }

    #[inline]
    pub const fn alert(&self) -> &Alert { self.alert.current() }
}

impl Default for AlertLayer {
    fn default() -> Self { Self::new() }
}

impl OverlayLayer for AlertLayer {
    fn kind(&self) -> LayerKind { LayerKind::Alerts }

    fn update_state(
        &mut self,
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    ) {
        if self.alert.compare_and_swap(Alert::derive(snapshot, started_frame)) {
            trace!("alert changed: {:?}", self.alert.current().text1);
            self.dirty = true;
        }
    }

    fn clear(&mut self) {
        self.alert.reset();
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool { self.dirty }

    fn take_dirty(&mut self) -> bool { core::mem::take(&mut self.dirty) }

    fn paint(
        &self,
        sink: &mut dyn RenderSink,
    ) {
        sink.paint_alert(self.alert.current());
    }
}

//! Profile diagnostic panel layer.
//!
//! Top of the stack, transparent to input. Runs the
//! [`ProfileStatusDeriver`] on every tick and repaints only when a line
//! changed.

use log::trace;

use super::{LayerKind, OverlayLayer};
use crate::change_gate::ChangeGate;
use crate::profile::{ProfileStatus, ProfileStatusDeriver};
use crate::render::RenderSink;
use crate::telemetry::TelemetrySnapshot;

#[derive(Debug)]
pub struct ProfileLayer {
    deriver: ProfileStatusDeriver,
    status: ChangeGate<ProfileStatus>,
    dirty: bool,
}

impl ProfileLayer {
    pub fn new(deriver: ProfileStatusDeriver) -> Self {
        Self {
            deriver,
            status: ChangeGate::new(),
            dirty: true,
        }
    }

    #[inline]
    pub const fn status(&self) -> &ProfileStatus { self.status.current() }
}

impl OverlayLayer for ProfileLayer {
    fn kind(&self) -> LayerKind { LayerKind::Profile }

    fn update_state(
        &mut self,
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    ) {
        let status = self.deriver.derive(snapshot, started_frame);
        if self.status.compare_and_swap(status) {
            trace!("profile status changed ({} lines)", self.status.current().len());
            self.dirty = true;
        }
    }

    fn clear(&mut self) {
        self.status.reset();
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool { self.dirty }

    fn take_dirty(&mut self) -> bool { core::mem::take(&mut self.dirty) }

    fn paint(
        &self,
        sink: &mut dyn RenderSink,
    ) {
        sink.paint_profile(self.status.current());
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;
    use crate::profile::ProfileNameTable;
    use crate::telemetry::{Channel, ControlsState};

    fn snapshot(
        frame: u64,
        plan: &str,
    ) -> TelemetrySnapshot {
        TelemetrySnapshot {
            frame,
            controls_state: Channel::new(
                frame,
                ControlsState {
                    custom_profile_enabled: true,
                    profile_plan: String::from(plan),
                    ..ControlsState::default()
                },
            ),
            ..TelemetrySnapshot::default()
        }
    }

    fn layer() -> ProfileLayer {
        let mut layer = ProfileLayer::new(ProfileStatusDeriver::new(ProfileNameTable::builtin()));
        layer.take_dirty();
        layer
    }

    #[test]
    fn test_identical_ticks_redraw_once() {
        let mut layer = layer();
        let mut redraws = 0;
        for frame in 10..30 {
            layer.update_state(&snapshot(frame, "3"), 10);
            redraws += u32::from(layer.take_dirty());
        }
        assert_eq!(redraws, 1, "Only the first tick changes the panel");
    }

    #[test]
    fn test_changed_line_redraws() {
        let mut layer = layer();
        layer.update_state(&snapshot(10, "3"), 10);
        layer.take_dirty();
        layer.update_state(&snapshot(11, "4"), 10);
        assert!(layer.take_dirty());
        assert_eq!(layer.status().lines()[1], "Coast Down");
    }

    #[test]
    fn test_clear_forces_redraw_of_previous_value() {
        let mut layer = layer();
        let snap = snapshot(10, "3");

        layer.update_state(&snap, 10);
        assert!(layer.take_dirty());
        layer.update_state(&snap, 10);
        assert!(!layer.take_dirty());

        layer.clear();
        assert!(layer.take_dirty(), "Clear requests a redraw itself");
        assert!(layer.status().is_empty());

        layer.update_state(&snap, 10);
        assert!(layer.take_dirty(), "Same value as before the clear must redraw");
    }

    #[test]
    fn test_stale_placeholder_after_clear_redraws() {
        let mut layer = layer();
        layer.clear();
        layer.take_dirty();
        layer.update_state(&snapshot(5, "3"), 10);
        assert!(layer.take_dirty());
        assert_eq!(layer.status(), &ProfileStatus::unknown());
    }
}

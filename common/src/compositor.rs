//! Overlay compositor: layer stack, session tracking and border color.
//!
//! The compositor receives every telemetry tick and every onroad/offroad
//! transition. Ticks outside a driving session are ignored. Inside a session
//! each layer updates and gates its own state, and the compositor gates the
//! border color, which repaints the whole window when it changes.
//!
//! # Stacking Order
//!
//! Fixed at construction, bottom first:
//!
//! ```text
//! 2  profile panel   (transparent to input)
//! 1  alerts          (transparent to input)
//! 0  camera + HUD    (receives input)
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::change_gate::ChangeGate;
use crate::colors::BorderColor;
use crate::layers::{AlertLayer, CameraLayer, LayerKind, OverlayLayer, ProfileLayer};
use crate::profile::ProfileStatusDeriver;
use crate::render::{DirtyMask, RenderSink};
use crate::telemetry::{Alert, DrivingStatus, TelemetrySnapshot};

/// Owns the overlay layers and the window border.
pub struct OverlayCompositor {
    layers: Vec<Box<dyn OverlayLayer>>,
    border: ChangeGate<BorderColor>,
    status: DrivingStatus,
    started: bool,
    started_frame: u64,
    window_dirty: bool,
}

impl OverlayCompositor {
    /// Build the standard stack: camera, alerts, profile.
    pub fn new(deriver: ProfileStatusDeriver) -> Self {
        let layers = alloc::vec![
            Box::new(CameraLayer::new()) as Box<dyn OverlayLayer>,
            Box::new(AlertLayer::new()) as Box<dyn OverlayLayer>,
            Box::new(ProfileLayer::new(deriver)) as Box<dyn OverlayLayer>,
        ];
        Self {
            layers,
            border: ChangeGate::with_initial(BorderColor::default()),
            status: DrivingStatus::default(),
            started: false,
            started_frame: 0,
            window_dirty: true,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle Signals
    // -------------------------------------------------------------------------

    /// Process one telemetry tick.
    ///
    /// Does nothing outside a driving session.
    pub fn on_tick(
        &mut self,
        snapshot: &TelemetrySnapshot,
    ) {
        if !self.started {
            return;
        }

        for layer in &mut self.layers {
            layer.update_state(snapshot, self.started_frame);
        }

        let alert = Alert::derive(snapshot, self.started_frame);
        self.status = DrivingStatus::from_alert(&alert, snapshot.is_engaged(self.started_frame));
        if self.border.compare_and_swap(BorderColor::for_status(self.status)) {
            debug!("border -> {:?}", self.status);
            self.window_dirty = true;
        }
    }

    /// Onroad (`active = true`) or offroad transition.
    ///
    /// Both directions clear every layer so the next valid tick repaints.
    pub fn on_mode_transition(
        &mut self,
        active: bool,
        frame: u64,
    ) {
        if active {
            self.session_start(frame);
        } else {
            self.session_end();
        }
    }

    /// Begin a driving session at feed frame `frame`.
    pub fn session_start(
        &mut self,
        frame: u64,
    ) {
        debug!("session start at frame {frame}");
        self.started = true;
        self.started_frame = frame;
        self.clear();
    }

    /// End the driving session.
    pub fn session_end(&mut self) {
        debug!("session end (started at frame {})", self.started_frame);
        self.started = false;
        self.clear();
    }

    /// Broadcast `clear()` to every layer and reset the border.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        self.border = ChangeGate::with_initial(BorderColor::default());
        self.status = DrivingStatus::default();
        self.window_dirty = true;
    }

    /// Force a full repaint, e.g. after the display was cleared externally.
    pub const fn invalidate(&mut self) { self.window_dirty = true; }

    // -------------------------------------------------------------------------
    // Paint Pass
    // -------------------------------------------------------------------------

    /// Collect and reset the pending redraw requests.
    pub fn take_redraw(&mut self) -> DirtyMask {
        let mut mask = DirtyMask {
            window: core::mem::take(&mut self.window_dirty),
            layers: 0,
        };
        for layer in &mut self.layers {
            if layer.take_dirty() {
                mask.mark_layer(layer.kind().index());
            }
        }
        mask
    }

    /// Paint everything that changed since the last pass.
    ///
    /// The border is painted when the window is dirty; layers are repainted
    /// from the lowest dirty one upward. Returns the mask that was handled.
    pub fn paint(
        &mut self,
        sink: &mut dyn RenderSink,
    ) -> DirtyMask {
        let mask = self.take_redraw();
        if mask.window {
            sink.paint_border(*self.border.current());
        }
        if let Some(first) = mask.first_repaint_layer() {
            trace!("repaint from layer {first} ({mask:?})");
            for layer in &self.layers[first..] {
                layer.paint(sink);
            }
        }
        mask
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// True if any repaint is pending.
    pub fn needs_paint(&self) -> bool { self.window_dirty || self.layers.iter().any(|l| l.is_dirty()) }

    /// Layers bottom-up.
    pub fn layers(&self) -> impl Iterator<Item = &(dyn OverlayLayer + 'static)> { self.layers.iter().map(|l| &**l) }

    /// Layer that receives pointer events: the topmost one accepting input.
    pub fn input_target(&self) -> Option<LayerKind> {
        self.layers.iter().rev().find(|l| l.accepts_input()).map(|l| l.kind())
    }

    #[inline]
    pub const fn border_color(&self) -> BorderColor { *self.border.current() }

    #[inline]
    pub const fn driving_status(&self) -> DrivingStatus { self.status }

    #[inline]
    pub const fn is_started(&self) -> bool { self.started }

    #[inline]
    pub const fn started_frame(&self) -> u64 { self.started_frame }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;
    use crate::layers::CameraHud;
    use crate::profile::{ProfileNameTable, ProfileStatus};
    use crate::render::layer_idx;
    use crate::telemetry::{AlertSize, AlertStatus, Channel, ControlsState};

    #[derive(Debug, PartialEq)]
    enum Paint {
        Border(BorderColor),
        Camera(CameraHud),
        Alert(String),
        Profile(usize),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Paint>,
    }

    impl RenderSink for RecordingSink {
        fn paint_border(
            &mut self,
            color: BorderColor,
        ) {
            self.calls.push(Paint::Border(color));
        }

        fn paint_camera(
            &mut self,
            hud: &CameraHud,
        ) {
            self.calls.push(Paint::Camera(*hud));
        }

        fn paint_alert(
            &mut self,
            alert: &Alert,
        ) {
            self.calls.push(Paint::Alert(alert.text1.clone()));
        }

        fn paint_profile(
            &mut self,
            status: &ProfileStatus,
        ) {
            self.calls.push(Paint::Profile(status.len()));
        }
    }

    fn compositor() -> OverlayCompositor { OverlayCompositor::new(ProfileStatusDeriver::new(ProfileNameTable::builtin())) }

    fn snapshot(
        frame: u64,
        enabled: bool,
    ) -> TelemetrySnapshot {
        TelemetrySnapshot {
            frame,
            controls_state: Channel::new(
                frame,
                ControlsState {
                    enabled,
                    profile_plan: String::from("1"),
                    ..ControlsState::default()
                },
            ),
            car_state: Channel::default(),
        }
    }

    fn started(frame: u64) -> OverlayCompositor {
        let mut c = compositor();
        c.session_start(frame);
        c.take_redraw();
        c
    }

    // -------------------------------------------------------------------------
    // Construction Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_stack_order() {
        let c = compositor();
        let kinds: Vec<LayerKind> = c.layers().map(|l| l.kind()).collect();
        assert_eq!(kinds, [LayerKind::Camera, LayerKind::Alerts, LayerKind::Profile]);
        for (i, kind) in kinds.iter().enumerate() {
            assert_eq!(kind.index(), i, "Layer index must match stack position");
        }
    }

    #[test]
    fn test_input_passes_through_overlays() {
        assert_eq!(compositor().input_target(), Some(LayerKind::Camera));
    }

    #[test]
    fn test_first_paint_is_full() {
        let mut c = compositor();
        assert!(c.needs_paint());
        let mut sink = RecordingSink::default();
        let mask = c.paint(&mut sink);
        assert_eq!(mask, DirtyMask::ALL);
        assert!(matches!(sink.calls[0], Paint::Border(_)));
        assert_eq!(sink.calls.len(), 4, "Border plus three layers");
    }

    // -------------------------------------------------------------------------
    // Tick Gating Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tick_before_session_is_noop() {
        let mut c = compositor();
        c.take_redraw();
        c.on_tick(&snapshot(5, true));
        assert!(c.take_redraw().is_empty());
        assert_eq!(c.driving_status(), DrivingStatus::Disengaged);
    }

    #[test]
    fn test_identical_ticks_redraw_once() {
        let mut c = started(100);
        let mut redraws = 0;
        for frame in 100..150 {
            c.on_tick(&snapshot(frame, false));
            if !c.take_redraw().is_empty() {
                redraws += 1;
            }
        }
        assert_eq!(redraws, 1, "One redraw for the first real values, none after");
    }

    #[test]
    fn test_border_change_dirties_window() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.take_redraw();

        c.on_tick(&snapshot(101, true));
        let mask = c.take_redraw();
        assert!(mask.window, "Engaging changes the border color");
        assert_eq!(c.driving_status(), DrivingStatus::Engaged);

        c.on_tick(&snapshot(102, true));
        assert!(!c.take_redraw().window, "Unchanged color must not repaint the window");
    }

    #[test]
    fn test_stale_controls_do_not_engage_border() {
        let mut c = started(200);
        c.on_tick(&TelemetrySnapshot {
            frame: 200,
            ..snapshot(150, true)
        });
        assert_eq!(c.driving_status(), DrivingStatus::Disengaged);
        assert_eq!(c.border_color(), BorderColor::default());
    }

    #[test]
    fn test_critical_alert_sets_border() {
        let mut c = started(100);
        let mut snap = snapshot(100, true);
        snap.controls_state.msg.alert_text1 = String::from("Brake!");
        snap.controls_state.msg.alert_status = AlertStatus::Critical;
        snap.controls_state.msg.alert_size = AlertSize::Full;
        c.on_tick(&snap);
        assert_eq!(c.driving_status(), DrivingStatus::Critical);
        assert_eq!(c.border_color(), BorderColor::for_status(DrivingStatus::Critical));
    }

    #[test]
    fn test_only_changed_layer_is_dirty() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.take_redraw();

        let mut snap = snapshot(101, false);
        snap.controls_state.msg.profile_history = String::from("S1");
        c.on_tick(&snap);
        let mask = c.take_redraw();
        assert!(!mask.window);
        assert!(mask.is_layer_dirty(layer_idx::PROFILE));
        assert!(!mask.is_layer_dirty(layer_idx::CAMERA));
        assert!(!mask.is_layer_dirty(layer_idx::ALERTS));
    }

    // -------------------------------------------------------------------------
    // Transition Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_session_start_captures_frame() {
        let mut c = compositor();
        c.on_mode_transition(true, 420);
        assert!(c.is_started());
        assert_eq!(c.started_frame(), 420);
    }

    #[test]
    fn test_offroad_clears_every_layer() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.take_redraw();

        c.on_mode_transition(false, 0);
        assert!(!c.is_started());
        let mask = c.take_redraw();
        for idx in [layer_idx::CAMERA, layer_idx::ALERTS, layer_idx::PROFILE] {
            assert!(mask.is_layer_dirty(idx), "Layer {idx} must be dirty after clear");
        }
    }

    #[test]
    fn test_offroad_resets_border() {
        let mut c = started(100);
        let mut snap = snapshot(100, true);
        snap.controls_state.msg.alert_text1 = String::from("Brake!");
        snap.controls_state.msg.alert_status = AlertStatus::Critical;
        snap.controls_state.msg.alert_size = AlertSize::Full;
        c.on_tick(&snap);
        c.take_redraw();
        assert_eq!(c.driving_status(), DrivingStatus::Critical);

        c.on_mode_transition(false, 0);
        assert_eq!(c.border_color(), BorderColor::default());
        assert_eq!(c.driving_status(), DrivingStatus::default());
        assert!(c.take_redraw().window, "Border reset repaints the window");

        let mut sink = RecordingSink::default();
        c.invalidate();
        c.paint(&mut sink);
        assert_eq!(sink.calls[0], Paint::Border(BorderColor::default()));
    }

    #[test]
    fn test_clear_forces_redraw_on_next_session() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.take_redraw();

        // Same data again in a new session still repaints
        c.on_mode_transition(false, 0);
        c.on_mode_transition(true, 100);
        c.take_redraw();
        c.on_tick(&snapshot(100, false));
        assert!(c.take_redraw().is_layer_dirty(layer_idx::PROFILE));
    }

    // -------------------------------------------------------------------------
    // Paint Pass Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_paint_profile_only() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.paint(&mut RecordingSink::default());

        let mut snap = snapshot(101, false);
        snap.controls_state.msg.profile_history = String::from("S2");
        c.on_tick(&snap);

        let mut sink = RecordingSink::default();
        c.paint(&mut sink);
        assert_eq!(sink.calls, vec![Paint::Profile(11)]);
    }

    #[test]
    fn test_paint_repaints_layers_above_dirty_one() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.paint(&mut RecordingSink::default());

        let mut snap = snapshot(101, false);
        snap.controls_state.msg.alert_text1 = String::from("Lane Departure");
        snap.controls_state.msg.alert_size = AlertSize::Small;
        c.on_tick(&snap);

        let mut sink = RecordingSink::default();
        let mask = c.paint(&mut sink);
        assert_eq!(mask.repaint_count(), 2);
        assert_eq!(sink.calls.len(), 2);
        assert_eq!(sink.calls[0], Paint::Alert(String::from("Lane Departure")));
        assert!(matches!(sink.calls[1], Paint::Profile(_)));
    }

    #[test]
    fn test_paint_with_nothing_dirty() {
        let mut c = started(100);
        c.on_tick(&snapshot(100, false));
        c.paint(&mut RecordingSink::default());

        c.on_tick(&snapshot(101, false));
        let mut sink = RecordingSink::default();
        assert!(c.paint(&mut sink).is_empty());
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_invalidate_forces_full_paint() {
        let mut c = started(100);
        c.invalidate();
        let mut sink = RecordingSink::default();
        c.paint(&mut sink);
        assert_eq!(sink.calls.len(), 4);
    }
}

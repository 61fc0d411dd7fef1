//! Overlay layers.
//!
//! Each layer derives its own state from the snapshot, gates it through a
//! [`ChangeGate`](crate::change_gate::ChangeGate) and raises its dirty flag
//! only when the gated state changed. The compositor owns the layers in a
//! fixed bottom-up order: camera, alerts, profile.

pub mod alerts;
pub mod camera;
pub mod profile;

pub use alerts::AlertLayer;
pub use camera::{CameraHud, CameraLayer};
pub use profile::ProfileLayer;

use crate::render::{RenderSink, layer_idx};
use crate::telemetry::TelemetrySnapshot;

/// Which layer an object is.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayerKind {
    Camera,
    Alerts,
    Profile,
}

impl LayerKind {
    /// Position of this layer in the stack (0 = bottom).
    pub const fn index(self) -> usize {
        match self {
            Self::Camera => layer_idx::CAMERA,
            Self::Alerts => layer_idx::ALERTS,
            Self::Profile => layer_idx::PROFILE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Alerts => "alerts",
            Self::Profile => "profile",
        }
    }
}

/// Capabilities shared by every overlay layer.
pub trait OverlayLayer {
    fn kind(&self) -> LayerKind;

    /// Derive this tick's state and raise the dirty flag if it changed.
    fn update_state(
        &mut self,
        snapshot: &TelemetrySnapshot,
        started_frame: u64,
    );

    /// Reset the retained state to empty and request a redraw.
    fn clear(&mut self);

    fn is_dirty(&self) -> bool;

    /// Read and reset the dirty flag.
    fn take_dirty(&mut self) -> bool;

    /// Hand the retained state to the sink.
    fn paint(
        &self,
        sink: &mut dyn RenderSink,
    );

    /// Whether pointer events stop at this layer. Overlays pass them through.
    fn accepts_input(&self) -> bool { false }
}

//! Redraw tracking and the paint seam.
//!
//! The overlay never paints on its own. Layers raise dirty flags when their
//! gated state changes; the paint pass collects them into a [`DirtyMask`] and
//! hands the current state of each affected layer to a [`RenderSink`].
//!
//! # Update Strategy
//!
//! | Element | Redraw trigger | Scope |
//! |---------|----------------|-------|
//! | Border | Border color changed / first frame / external clear | Whole window |
//! | Camera HUD | Rounded speed or engagement changed | Layer and everything above |
//! | Alert | Alert text/status/size changed | Layer and everything above |
//! | Profile panel | Any panel line changed | Layer only (top of stack) |
//!
//! Layers are painted bottom-up so a repainted layer never covers a layer
//! stacked above it.

use crate::colors::BorderColor;
use crate::layers::camera::CameraHud;
use crate::profile::ProfileStatus;
use crate::telemetry::Alert;

// =============================================================================
// Layer Indices
// =============================================================================

/// Number of layers in the overlay stack.
pub const LAYER_COUNT: usize = 3;

/// Layer positions in the stack, bottom first.
pub mod layer_idx {
    pub const CAMERA: usize = 0;
    pub const ALERTS: usize = 1;
    pub const PROFILE: usize = 2;
}

// =============================================================================
// Dirty Mask
// =============================================================================

/// Redraw requests collected since the last paint pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DirtyMask {
    /// Whole window (border) needs repainting.
    pub window: bool,
    /// Bit `i` set when layer `i` requested a redraw.
    pub layers: u8,
}

impl DirtyMask {
    /// A mask with every layer and the window dirty.
    pub const ALL: Self = Self {
        window: true,
        layers: (1 << LAYER_COUNT) - 1,
    };

    #[inline]
    pub const fn is_empty(self) -> bool { !self.window && self.layers == 0 }

    #[inline]
    pub const fn is_layer_dirty(
        self,
        idx: usize,
    ) -> bool {
        self.layers & (1 << idx) != 0
    }

    #[inline]
    pub const fn mark_layer(
        &mut self,
        idx: usize,
    ) {
        self.layers |= 1 << idx;
    }

    /// Lowest layer that has to be repainted, if any.
    ///
    /// A dirty window repaints the whole stack.
    pub const fn first_repaint_layer(self) -> Option<usize> {
        if self.window {
            return Some(0);
        }
        if self.layers == 0 {
            None
        } else {
            Some(self.layers.trailing_zeros() as usize)
        }
    }

    /// Number of layers repainted for this mask.
    pub const fn repaint_count(self) -> usize {
        match self.first_repaint_layer() {
            Some(first) => LAYER_COUNT - first,
            None => 0,
        }
    }
}

// =============================================================================
// Render Sink
// =============================================================================

/// Backend that turns layer state into pixels.
///
/// Called only from the paint pass, in stacking order.
pub trait RenderSink {
    fn paint_border(
        &mut self,
        color: BorderColor,
    );

    fn paint_camera(
        &mut self,
        hud: &CameraHud,
    );

    fn paint_alert(
        &mut self,
        alert: &Alert,
    );

    fn paint_profile(
        &mut self,
        status: &ProfileStatus,
    );
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_indices_bottom_up() {
        assert_eq!(layer_idx::CAMERA, 0, "Camera is the base layer");
        assert_eq!(layer_idx::ALERTS, 1);
        assert_eq!(layer_idx::PROFILE, 2, "Profile panel is on top");
        assert!(LAYER_COUNT <= 8, "Layer bits must fit in u8");
    }

    #[test]
    fn test_empty_mask() {
        let mask = DirtyMask::default();
        assert!(mask.is_empty());
        assert_eq!(mask.first_repaint_layer(), None);
        assert_eq!(mask.repaint_count(), 0);
    }

    #[test]
    fn test_window_repaints_everything() {
        let mask = DirtyMask {
            window: true,
            layers: 0,
        };
        assert_eq!(mask.first_repaint_layer(), Some(0));
        assert_eq!(mask.repaint_count(), LAYER_COUNT);
    }

    #[test]
    fn test_repaint_starts_at_lowest_dirty_layer() {
        let mut mask = DirtyMask::default();
        mask.mark_layer(layer_idx::PROFILE);
        assert_eq!(mask.first_repaint_layer(), Some(layer_idx::PROFILE));
        assert_eq!(mask.repaint_count(), 1);

        mask.mark_layer(layer_idx::ALERTS);
        assert_eq!(mask.first_repaint_layer(), Some(layer_idx::ALERTS));
        assert_eq!(mask.repaint_count(), 2);
        assert!(mask.is_layer_dirty(layer_idx::ALERTS));
        assert!(!mask.is_layer_dirty(layer_idx::CAMERA));
    }

    #[test]
    fn test_all_mask() {
        assert!(!DirtyMask::ALL.is_empty());
        for idx in 0..LAYER_COUNT {
            assert!(DirtyMask::ALL.is_layer_dirty(idx));
        }
    }
}

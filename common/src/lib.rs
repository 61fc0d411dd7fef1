//! Core types and logic for the onroad driving overlay.
//!
//! This crate contains the platform-agnostic part of the overlay shared between
//! the desktop simulator and any embedded target:
//!
//! - [`telemetry`]: Channel snapshots read on every tick
//! - [`change_gate`]: Equality-gated memoization of layer state
//! - [`profile`]: Profile status derivation and profile name lookup
//! - [`profile_control`]: Custom profile plan executor
//! - [`layers`]: The camera, alert and profile overlay layers
//! - [`compositor`]: Layer stack, session tracking and border color
//! - [`render`]: Dirty mask and the [`RenderSink`](render::RenderSink) seam
//! - [`widgets`]: `embedded-graphics` implementation of the render sink
//! - [`colors`], [`config`], [`styles`]: Palette, layout and text styles
//! - [`event_log`]: Ring buffer of recent session events
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` (with `alloc`) outside of tests. It never reads a
//! clock; every time value is handed in by the caller.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;

pub mod change_gate;
pub mod colors;
pub mod compositor;
pub mod config;
pub mod error;
pub mod event_log;
pub mod layers;
pub mod pages;
pub mod profile;
pub mod profile_control;
pub mod render;
pub mod styles;
pub mod telemetry;
pub mod widgets;

// Re-export commonly used items
pub use change_gate::{ChangeGate, should_update};
pub use compositor::OverlayCompositor;
pub use error::OverlayError;
pub use pages::Page;
pub use profile::{ProfileNameTable, ProfileStatus, ProfileStatusDeriver};
pub use render::{DirtyMask, RenderSink};
pub use telemetry::{CarState, Channel, ControlsState, DrivingStatus, TelemetrySnapshot};

//! Onroad overlay simulator for desktop platforms.
//!
//! Synthesizes telemetry, feeds it through the overlay compositor and renders
//! the result with `embedded-graphics-simulator`. `--headless` runs a scripted
//! session without opening a window and logs redraw statistics.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Space | Onroad / offroad |
//! | E | Engage / disengage |
//! | C | Stock / custom profile mode |
//! | P | Next profile plan |
//! | S | Start the selected plan |
//! | L | Stall / resume `controlsState` |
//! | B (hold) | Brake |
//! | Y | Overlay / debug page |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod feed;
mod profiling;
mod screens;
mod settings;
mod timing;

use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use env_logger::Env;
use log::{debug, info};
use overlay_common::colors::BLACK;
use overlay_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use overlay_common::event_log::EventLog;
use overlay_common::render::layer_idx;
use overlay_common::widgets::DisplaySink;
use overlay_common::{DirtyMask, OverlayCompositor, Page, ProfileStatusDeriver};

use crate::feed::TelemetryFeed;
use crate::profiling::ProfilingMetrics;
use crate::screens::draw_debug_page;
use crate::settings::{SCALE_RANGE, Settings};
use crate::timing::{FRAME_TIME, tick_period};

#[derive(Parser, Debug)]
#[command(name = "simulator", version, about = "Desktop simulator for the onroad overlay")]
struct Args {
    /// TOML configuration file (profile names, plans, feed rate, scale)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window pixel scale (1-8), overrides the configuration file
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(i64::from(*SCALE_RANGE.start())..=i64::from(*SCALE_RANGE.end()))
    )]
    scale: Option<u32>,

    /// Run a scripted session without opening a window
    #[arg(long)]
    headless: bool,

    /// Number of ticks to run in headless mode
    #[arg(long, default_value_t = 700)]
    ticks: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

// =============================================================================
// Simulation
// =============================================================================

/// A user or script action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Action {
    Onroad,
    Offroad,
    ToggleEngaged,
    ToggleCustom,
    NextPlan,
    StartProfile,
    ToggleStall,
    Brake(bool),
}

struct Simulation {
    feed: TelemetryFeed,
    compositor: OverlayCompositor,
    sink: DisplaySink<SimulatorDisplay<Rgb565>>,
    log: EventLog,
    metrics: ProfilingMetrics,
}

impl Simulation {
    fn apply(
        &mut self,
        action: Action,
    ) {
        debug!("action {action:?}");
        match action {
            Action::Onroad | Action::Offroad => {
                let active = action == Action::Onroad;
                if active == self.compositor.is_started() {
                    return;
                }
                info!("{} at frame {}", if active { "onroad" } else { "offroad" }, self.feed.frame());
                self.log.push(if active { "Onroad" } else { "Offroad" });
                self.compositor.on_mode_transition(active, self.feed.frame());
            }
            Action::ToggleEngaged => self.feed.toggle_engaged(&mut self.log),
            Action::ToggleCustom => self.feed.toggle_custom(&mut self.log),
            Action::NextPlan => self.feed.next_plan(&mut self.log),
            Action::StartProfile => self.feed.start_profile(&mut self.log),
            Action::ToggleStall => self.feed.toggle_stall(&mut self.log),
            Action::Brake(pressed) => self.feed.set_brake(pressed),
        }
    }

    fn tick(&mut self) {
        let snapshot = self.feed.tick(&mut self.log);
        self.compositor.on_tick(&snapshot);
        self.metrics.inc_ticks();
    }

    fn paint(&mut self) -> DirtyMask {
        let mask = self.compositor.paint(&mut self.sink);
        self.metrics.record_paint(mask);
        mask
    }

    fn log_summary(&self) {
        let m = &self.metrics;
        info!(
            "{} ticks, {} paint passes ({:.1}%), border {}, camera {}, alerts {}, profile {}",
            m.ticks,
            m.paint_passes,
            m.paint_ratio(),
            m.border_redraws,
            m.layer_redraws[layer_idx::CAMERA],
            m.layer_redraws[layer_idx::ALERTS],
            m.layer_redraws[layer_idx::PROFILE],
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }))
        .format_timestamp_millis()
        .init();

    let settings = Settings::load(args.config.as_deref())?;
    let names = settings.name_table().context("building profile name table")?;
    let plans = settings.plans();
    info!(
        "{} v{}: {} profile names, {} plans, {} Hz",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        names.len(),
        plans.len(),
        settings.feed.tick_hz
    );

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    display.clear(BLACK).ok();

    let mut sim = Simulation {
        feed: TelemetryFeed::new(&plans, settings.feed.tick_hz).context("loading profile plans")?,
        compositor: OverlayCompositor::new(ProfileStatusDeriver::new(names)),
        sink: DisplaySink::new(display),
        log: EventLog::new(),
        metrics: ProfilingMetrics::new(),
    };
    sim.log.push("Simulator started");

    if args.headless {
        run_headless(&mut sim, args.ticks, settings.feed.tick_hz);
    } else {
        run_window(&mut sim, args.scale.unwrap_or(settings.display.scale), settings.feed.tick_hz);
    }
    sim.log_summary();
    Ok(())
}

// =============================================================================
// Headless Session
// =============================================================================

/// Scripted session: `(seconds, action)`.
const SCRIPT: [(f32, Action); 12] = [
    (0.0, Action::Onroad),
    (1.0, Action::ToggleEngaged),
    (2.0, Action::ToggleCustom),
    (3.0, Action::StartProfile),
    (12.0, Action::NextPlan),
    (13.0, Action::StartProfile),
    (18.0, Action::ToggleStall),
    (26.0, Action::ToggleStall),
    (28.0, Action::Brake(true)),
    (29.0, Action::Brake(false)),
    (31.0, Action::ToggleEngaged),
    (34.0, Action::Offroad),
];

fn run_headless(
    sim: &mut Simulation,
    ticks: u64,
    tick_hz: u32,
) {
    info!("headless session: {ticks} ticks");
    let mut script = SCRIPT
        .iter()
        .map(|&(secs, action)| ((secs * tick_hz as f32).round() as u64, action))
        .peekable();

    for tick in 0..ticks {
        while let Some(&(at, action)) = script.peek() {
            if at > tick {
                break;
            }
            sim.apply(action);
            script.next();
        }
        sim.tick();
        let mask = sim.paint();
        if !mask.is_empty() {
            debug!("tick {tick}: {mask:?}");
        }
    }

    for entry in sim.log.iter() {
        debug!("event: {entry}");
    }
}

// =============================================================================
// Window Session
// =============================================================================

fn action_for_key(keycode: Keycode) -> Option<Action> {
    match keycode {
        Keycode::E => Some(Action::ToggleEngaged),
        Keycode::C => Some(Action::ToggleCustom),
        Keycode::P => Some(Action::NextPlan),
        Keycode::S => Some(Action::StartProfile),
        Keycode::L => Some(Action::ToggleStall),
        Keycode::B => Some(Action::Brake(true)),
        _ => None,
    }
}

fn run_window(
    sim: &mut Simulation,
    scale: u32,
    tick_hz: u32,
) {
    let output_settings = OutputSettingsBuilder::new().scale(scale).build();
    let mut window = Window::new("Onroad Overlay Sim", &output_settings);
    window.update(sim.sink.display());

    let tick_every = tick_period(tick_hz);
    let mut next_tick = Instant::now();
    let mut page = Page::default();

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Space => {
                            let action = if sim.compositor.is_started() { Action::Offroad } else { Action::Onroad };
                            sim.apply(action);
                        }
                        Keycode::Y => {
                            page = page.toggle();
                            sim.log.push(match page {
                                Page::Overlay => "Page: Overlay",
                                Page::Debug => "Page: Debug",
                            });
                            if page == Page::Overlay {
                                sim.sink.display_mut().clear(BLACK).ok();
                                sim.compositor.invalidate();
                            }
                        }
                        _ => {
                            if let Some(action) = action_for_key(keycode) {
                                sim.apply(action);
                            }
                        }
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } if keycode == Keycode::B => sim.apply(Action::Brake(false)),
                _ => {}
            }
        }

        // Catch up on ticks missed while the window was busy
        while next_tick <= frame_start {
            sim.tick();
            next_tick += tick_every;
        }

        match page {
            Page::Overlay => {
                sim.paint();
            }
            Page::Debug => {
                draw_debug_page(sim.sink.display_mut(), &sim.metrics, &sim.compositor, &sim.feed, &sim.log);
            }
        }
        let render_time = frame_start.elapsed();

        window.update(sim.sink.display());

        let pre_sleep = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(pre_sleep) {
            thread::sleep(remaining);
        }
        let sleep_time = frame_start.elapsed().saturating_sub(pre_sleep);

        sim.metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Ghost detector simulator for desktop platforms.
//!
//! Runs the detector pipeline against a simulated device. By default a
//! scripted headless session is played and the final frame is written as a
//! PNG; with the `window` feature and `--window` it opens an SDL window.
//!
//! Keys in the window: `C` calibrate, `M` microphone, `G` ghost, `L` log
//! page, `S` stop sensors, `Esc` quit.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod app;
mod audio;
mod cli;
mod platform;
mod popup;
mod render;
mod screens;
mod sink;
mod timing;
#[cfg(feature = "window")]
mod window;

use anyhow::Context;
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use ghost_common::Quantity;
use ghost_common::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::app::{App, baselines, headless_script};
use crate::cli::Cli;
use crate::platform::PlatformOptions;
use crate::timing::FRAME_MS;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let mut options = PlatformOptions::new(cli.platform);
    options.deny_permission = cli.deny_permission;
    options.linear_acceleration = !cli.no_linear;

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));

    if cli.window {
        #[cfg(feature = "window")]
        return window::run(&mut display, config, options, !cli.no_mic, cli.scale);
        #[cfg(not(feature = "window"))]
        anyhow::bail!("--window needs the simulator built with the `window` feature");
    }

    let mut app = App::new(config, options, !cli.no_mic, 0)?;
    let script = headless_script(&config);
    let mut next = 0;
    let mut now_ms = 0;
    for frame in 0..cli.frames {
        now_ms = u64::from(frame) * FRAME_MS;
        while let Some(&(at_ms, command)) = script.get(next)
            && at_ms <= now_ms
        {
            app.command(command, now_ms);
            next += 1;
        }
        app.step(now_ms);
    }
    app.draw(&mut display);

    let output_settings = OutputSettingsBuilder::new().scale(cli.scale).build();
    display
        .to_rgb_output_image(&output_settings)
        .save_png(&cli.snapshot)
        .with_context(|| format!("writing {}", cli.snapshot.display()))?;

    let (magnetic, vibration) = baselines(app.detector());
    let stats = app.detector().normalizer_stats();
    tracing::info!(
        frames = cli.frames,
        elapsed_ms = now_ms,
        alert = app.sink().alert(),
        emf = ?app.sink().value(Quantity::MagneticField),
        vib = ?app.sink().value(Quantity::Vibration),
        magnetic_baseline = magnetic,
        vibration_baseline = vibration,
        emitted = stats.emitted,
        dropped = stats.dropped,
        absorbed = stats.absorbed,
        status = app.sink().status_text(),
        status_changes = app.sink().status_changes(),
        mic = app.mic_running(),
        ghost = app.platform().ghost_active(now_ms),
        page = ?app.page(),
        popup = ?app.popup(),
        snapshot = %cli.snapshot.display(),
        "headless run finished"
    );
    Ok(())
}

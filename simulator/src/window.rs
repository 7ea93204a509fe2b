//! Interactive SDL window.

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use ghost_common::DetectorConfig;
use ghost_common::adapter::SensorPlatform;
use ghost_common::colors::BLACK;

use crate::app::{App, Command};
use crate::platform::{PlatformOptions, SimulatedPlatform};
use crate::screens::run_boot_screen;
use crate::timing::FRAME_TIME;

const fn command_for(keycode: Keycode) -> Option<Command> {
    match keycode {
        Keycode::C => Some(Command::Calibrate),
        Keycode::M => Some(Command::ToggleMic),
        Keycode::G => Some(Command::Ghost),
        Keycode::L => Some(Command::TogglePage),
        Keycode::S => Some(Command::Stop),
        _ => None,
    }
}

pub fn run(
    display: &mut SimulatorDisplay<Rgb565>,
    config: DetectorConfig,
    options: PlatformOptions,
    mic_available: bool,
    scale: u32,
) -> anyhow::Result<()> {
    let output_settings = OutputSettingsBuilder::new().scale(scale).build();
    let mut window = Window::new("Ghost Detector Sim", &output_settings);

    display.clear(BLACK).ok();
    window.update(display);

    let caps = SimulatedPlatform::new(options).capabilities();
    if !run_boot_screen(display, &mut window, &caps) {
        return Ok(());
    }

    let start = Instant::now();
    let now = || start.elapsed().as_millis() as u64;
    let mut app = App::new(config, options, mic_available, now())?;

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => {
                    app.shutdown(now());
                    return Ok(());
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    if keycode == Keycode::Escape {
                        app.shutdown(now());
                        return Ok(());
                    }
                    if let Some(command) = command_for(keycode) {
                        app.command(command, now());
                    }
                }
                _ => {}
            }
        }

        app.step(now());
        app.draw(display);
        window.update(display);

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}

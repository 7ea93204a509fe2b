//! Boot console shown before the detector page in the window.

use core::fmt::Write;
use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use embedded_graphics_simulator::{SimulatorDisplay, SimulatorEvent, Window};
use ghost_common::adapter::{AdapterKind, Capabilities};
use ghost_common::colors::{BLACK, PHOSPHOR};
use ghost_common::styles::{CENTERED, LEFT_ALIGNED};
use heapless::String;

const TITLE_POS: Point = Point::new(160, 25);
const LINE_START: Point = Point::new(10, 35);
const LINE_END: Point = Point::new(310, 35);
const CONSOLE_X: i32 = 10;
const CONSOLE_START_Y: i32 = 50;
const CONSOLE_LINE_HEIGHT: i32 = 14;
const MAX_LINES: usize = 12;

const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, PHOSPHOR);
const CONSOLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, PHOSPHOR);
const DIVIDER_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(PHOSPHOR, 1);

const fn yes_no(present: bool) -> &'static str { if present { "found" } else { "missing" } }

/// Console lines describing what the probe found.
fn probe_lines(caps: &Capabilities) -> Vec<(std::string::String, u64)> {
    let kind = AdapterKind::select(caps);
    vec![
        ("Probing sensors...".into(), 600),
        (format!("Magnetometer: {}", yes_no(caps.magnetometer)), 300),
        (format!("Linear accel: {}", yes_no(caps.linear_acceleration)), 300),
        (format!("Motion events: {}", yes_no(caps.motion_events)), 300),
        (format!("Orientation events: {}", yes_no(caps.orientation_events)), 300),
        (format!("Acquisition: {}", kind.mode_name()), 500),
        ("Ready.".into(), 400),
    ]
}

/// Returns false if the window was closed.
pub fn run_boot_screen(
    display: &mut SimulatorDisplay<Rgb565>,
    window: &mut Window,
    caps: &Capabilities,
) -> bool {
    let spinner_chars = ['|', '/', '-', '\\'];
    let mut spinner_idx = 0;
    let mut spinner_frame = 0u32;
    let mut console_lines: Vec<std::string::String> = Vec::new();

    for (msg, duration_ms) in probe_lines(caps) {
        console_lines.push(msg);
        if console_lines.len() > MAX_LINES {
            console_lines.remove(0);
        }

        let msg_start = Instant::now();
        while msg_start.elapsed() < Duration::from_millis(duration_ms) {
            if window.events().any(|ev| matches!(ev, SimulatorEvent::Quit)) {
                return false;
            }

            display.clear(BLACK).ok();

            spinner_frame = spinner_frame.wrapping_add(1);
            if spinner_frame.is_multiple_of(8) {
                spinner_idx = (spinner_idx + 1) % spinner_chars.len();
            }
            let mut title: String<32> = String::new();
            let _ = write!(title, "{}  Summoning  {}", spinner_chars[spinner_idx], spinner_chars[(spinner_idx + 2) % 4]);
            Text::with_text_style(&title, TITLE_POS, TITLE_STYLE, CENTERED)
                .draw(display)
                .ok();

            Line::new(LINE_START, LINE_END)
                .into_styled(DIVIDER_STYLE)
                .draw(display)
                .ok();

            for (i, line) in console_lines.iter().enumerate() {
                let y = CONSOLE_START_Y + i as i32 * CONSOLE_LINE_HEIGHT;
                let prefix = if i == console_lines.len() - 1 { "> " } else { "  " };
                let mut full: String<64> = String::new();
                let _ = write!(full, "{prefix}{line}");
                Text::with_text_style(&full, Point::new(CONSOLE_X, y), CONSOLE_STYLE, LEFT_ALIGNED)
                    .draw(display)
                    .ok();
            }

            window.update(display);
            thread::sleep(Duration::from_millis(16));
        }
    }
    true
}

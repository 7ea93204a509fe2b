//! Log page: sensor and calibration state above a terminal of recent events.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use ghost_common::calibration::BaselineSource;
use ghost_common::colors::{BLACK, GRAY, GREEN, WHITE, YELLOW};
use ghost_common::event_log::EventLog;
use ghost_common::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use ghost_common::styles::LABEL_FONT;
use ghost_common::{Detector, Quantity, SensorAdapter};
use heapless::String;

const HEADER_Y: i32 = 12;
const HEADER_DIVIDER_Y: i32 = 18;
const SECTION_HEADER_Y: i32 = 30;
const STATS_Y: i32 = 44;
const STAT_LINE_HEIGHT: i32 = 13;
const LOG_DIVIDER_Y: i32 = 100;
const LOG_Y: i32 = 112;
const LOG_LINE_HEIGHT: i32 = 12;
const COL1_X: i32 = 4;
const COL2_X: i32 = 110;
const COL3_X: i32 = 215;

/// Terminal lines that fit below the stats.
pub const VISIBLE_LOG_LINES: usize = ((SCREEN_HEIGHT as i32 - LOG_Y) / LOG_LINE_HEIGHT) as usize;

const HEADER_COLOR: Rgb565 = GREEN;
const SECTION_COLOR: Rgb565 = GRAY;
const VALUE_COLOR: Rgb565 = WHITE;
const HIGHLIGHT_COLOR: Rgb565 = YELLOW;
const TERMINAL_BG: Rgb565 = Rgb565::new(1, 2, 1);

const fn source_name(source: BaselineSource) -> &'static str {
    match source {
        BaselineSource::Default => "default",
        BaselineSource::Measured => "measured",
        BaselineSource::Defaulted => "fallback",
    }
}

pub fn draw_log_page<D>(
    display: &mut D,
    detector: &Detector,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();
    draw_header(display, detector);
    draw_horizontal_line(display, HEADER_DIVIDER_Y);
    draw_section_headers(display);
    draw_sensor_column(display, detector);
    draw_calibration_column(display, detector);
    draw_pipeline_column(display, detector);
    draw_horizontal_line(display, LOG_DIVIDER_Y);
    draw_log_terminal(display, detector.log());
}

fn draw_header<D>(
    display: &mut D,
    detector: &Detector,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let header_style = MonoTextStyle::new(LABEL_FONT, HEADER_COLOR);
    let info_style = MonoTextStyle::new(LABEL_FONT, VALUE_COLOR);

    Text::new("EVENT LOG", Point::new(COL1_X, HEADER_Y), header_style)
        .draw(display)
        .ok();

    let mut mode: String<32> = String::new();
    let _ = write!(
        mode,
        "{} / {}",
        detector.config().profile.name(),
        detector.adapter().kind().mode_name()
    );
    Text::new(&mode, Point::new(COL2_X, HEADER_Y), info_style)
        .draw(display)
        .ok();

    let state = if detector.is_running() { "RUN" } else { "IDLE" };
    Text::new(state, Point::new(290, HEADER_Y), info_style)
        .draw(display)
        .ok();
}

fn draw_section_headers<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(LABEL_FONT, SECTION_COLOR);
    for (title, x) in [("SENSORS", COL1_X), ("BASELINE", COL2_X), ("PIPELINE", COL3_X)] {
        Text::new(title, Point::new(x, SECTION_HEADER_Y), style)
            .draw(display)
            .ok();
    }
}

fn draw_sensor_column<D>(
    display: &mut D,
    detector: &Detector,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let value_style = MonoTextStyle::new(LABEL_FONT, VALUE_COLOR);
    let mut y = STATS_Y;
    for quantity in Quantity::ALL {
        let mut s: String<20> = String::new();
        let _ = write!(s, "{}: {}", quantity.label(), detector.adapter().status(quantity).tag());
        Text::new(&s, Point::new(COL1_X, y), value_style).draw(display).ok();
        y += STAT_LINE_HEIGHT;

        let mut s: String<20> = String::new();
        match detector.adapter().current(quantity) {
            Some(v) => {
                let _ = write!(s, "  {v:.2}");
            }
            None => {
                let _ = write!(s, "  --");
            }
        }
        Text::new(&s, Point::new(COL1_X, y), value_style).draw(display).ok();
        y += STAT_LINE_HEIGHT;
    }
}

fn draw_calibration_column<D>(
    display: &mut D,
    detector: &Detector,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let value_style = MonoTextStyle::new(LABEL_FONT, VALUE_COLOR);
    let highlight_style = MonoTextStyle::new(LABEL_FONT, HIGHLIGHT_COLOR);
    let calibration = detector.calibration();
    let mut y = STATS_Y;
    for quantity in Quantity::ALL {
        let state = calibration.state(quantity);
        let mut s: String<20> = String::new();
        let _ = write!(s, "{}: {:.1}", quantity.label(), state.baseline());
        Text::new(&s, Point::new(COL2_X, y), value_style).draw(display).ok();
        y += STAT_LINE_HEIGHT;

        let mut s: String<20> = String::new();
        if state.is_calibrating() {
            let _ = write!(s, "  cal {}", state.samples().len());
            Text::new(&s, Point::new(COL2_X, y), highlight_style).draw(display).ok();
        } else {
            let _ = write!(s, "  {}", source_name(state.source()));
            Text::new(&s, Point::new(COL2_X, y), value_style).draw(display).ok();
        }
        y += STAT_LINE_HEIGHT;
    }
}

fn draw_pipeline_column<D>(
    display: &mut D,
    detector: &Detector,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let value_style = MonoTextStyle::new(LABEL_FONT, VALUE_COLOR);
    let stats = detector.normalizer_stats();
    let mut y = STATS_Y;
    for (label, count) in [("Emit: ", stats.emitted), ("Drop: ", stats.dropped), ("Cal:  ", stats.absorbed)] {
        let mut s: String<20> = String::new();
        let _ = write!(s, "{label}{count}");
        Text::new(&s, Point::new(COL3_X, y), value_style).draw(display).ok();
        y += STAT_LINE_HEIGHT;
    }

    let alert_style = MonoTextStyle::new(LABEL_FONT, if detector.alert_active() { HIGHLIGHT_COLOR } else { VALUE_COLOR });
    let alert = if detector.alert_active() { "Alert: ON" } else { "Alert: off" };
    Text::new(alert, Point::new(COL3_X, y), alert_style).draw(display).ok();
}

/// Most recent entries, each in its level color with a level prefix.
fn draw_log_terminal<D>(
    display: &mut D,
    log: &EventLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(
        Point::new(0, LOG_DIVIDER_Y + 2),
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT - LOG_DIVIDER_Y as u32 - 2),
    )
    .into_styled(PrimitiveStyle::with_fill(TERMINAL_BG))
    .draw(display)
    .ok();

    let skip = log.len().saturating_sub(VISIBLE_LOG_LINES);
    let mut y = LOG_Y;
    for entry in log.iter().skip(skip) {
        let style = MonoTextStyle::new(LABEL_FONT, entry.level.color());
        let mut line: String<64> = String::new();
        let _ = write!(
            line,
            "{} {:>3}.{} {}",
            entry.level.prefix(),
            entry.timestamp_ms / 1000,
            (entry.timestamp_ms % 1000) / 100,
            entry.message
        );
        Text::new(&line, Point::new(COL1_X, y), style).draw(display).ok();
        y += LOG_LINE_HEIGHT;
    }
}

fn draw_horizontal_line<D>(
    display: &mut D,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(Point::new(2, y), Point::new(SCREEN_WIDTH as i32 - 2, y))
        .into_styled(PrimitiveStyle::with_stroke(GRAY, 1))
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

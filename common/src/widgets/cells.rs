//! Quantity cells: label, large value, status tag and a chart strip.
//!
//! | Quantity | Trace color | Guide line |
//! |----------|-------------|------------|
//! | EMF | phosphor green | alert threshold |
//! | VIB | cyan | none |
//!
//! The EMF cell background turns dark red while the alert is active. A
//! degraded sensor shows its status tag in place of the value.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use heapless::String;

use super::primitives::{draw_cell_background, draw_chart, draw_value_with_outline};
use crate::adapter::SensorStatus;
use crate::chart::ChartBuffer;
use crate::colors::{BLACK, CYAN, DARK_RED, LIGHT_GRAY, PHOSPHOR, RED, WHITE, YELLOW};
use crate::layout::{CELL_HEIGHT, CELL_WIDTH, CELL_Y, CHART_HEIGHT, CHART_MARGIN};
use crate::quantity::Quantity;
use crate::sink::format_value;
use crate::styles::{CENTERED, LABEL_FONT, LABEL_STYLE_DIM, LABEL_STYLE_WHITE, LEFT_ALIGNED, RIGHT_ALIGNED, VALUE_FONT};

/// Everything a cell needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    pub quantity: Quantity,
    /// Last displayed value; `None` before the first reading.
    pub value: Option<f32>,
    pub chart: &'a ChartBuffer,
    pub status: SensorStatus,
    /// Alert threshold drawn as a guide on the chart.
    pub threshold: Option<f32>,
    pub calibrating: bool,
    pub alert: bool,
}

/// Trace color per quantity.
pub const fn trace_color(quantity: Quantity) -> Rgb565 {
    match quantity {
        Quantity::MagneticField => PHOSPHOR,
        Quantity::Vibration => CYAN,
    }
}

/// Left edge of a quantity's cell.
pub const fn cell_x(quantity: Quantity) -> u32 { quantity.index() as u32 * CELL_WIDTH }

fn status_color(status: SensorStatus) -> Rgb565 {
    match status {
        SensorStatus::Active => LIGHT_GRAY,
        SensorStatus::Inactive | SensorStatus::Unsupported => YELLOW,
        SensorStatus::PermissionDenied | SensorStatus::Errored(_) => RED,
    }
}

/// Draw one quantity cell in its column.
pub fn draw_quantity_cell<D>(
    display: &mut D,
    view: &CellView<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let x = cell_x(view.quantity);
    let y = CELL_Y;
    let w = CELL_WIDTH;
    let h = CELL_HEIGHT;

    let alert_fill = view.alert && view.quantity == Quantity::MagneticField;
    let bg = if alert_fill { DARK_RED } else { BLACK };
    draw_cell_background(display, x, y, w, h, bg);

    let left = x as i32 + 8;
    let right = (x + w) as i32 - 8;
    let center_x = (x + w / 2) as i32;

    // Label with unit
    let mut label: String<16> = String::new();
    write!(label, "{} {}", view.quantity.label(), view.quantity.unit()).ok();
    Text::with_text_style(&label, Point::new(left, y as i32 + 14), LABEL_STYLE_WHITE, LEFT_ALIGNED)
        .draw(display)
        .ok();

    // Status tag, or CAL while calibrating
    let (tag, tag_color) = if view.calibrating {
        ("CAL", YELLOW)
    } else {
        (view.status.tag(), status_color(view.status))
    };
    Text::with_text_style(
        tag,
        Point::new(right, y as i32 + 14),
        MonoTextStyle::new(LABEL_FONT, tag_color),
        RIGHT_ALIGNED,
    )
    .draw(display)
    .ok();

    // Main value
    let value_pos = Point::new(center_x, y as i32 + 50);
    match view.value {
        Some(value) if view.status.is_usable() => {
            let text = format_value(value);
            let color = if alert_fill { WHITE } else { trace_color(view.quantity) };
            draw_value_with_outline(display, &text, value_pos, VALUE_FONT, color, CENTERED);
        }
        _ => {
            Text::with_text_style("--", value_pos, LABEL_STYLE_DIM, CENTERED)
                .draw(display)
                .ok();
        }
    }

    let chart_area = Rectangle::new(
        Point::new((x + CHART_MARGIN) as i32, (y + h - CHART_MARGIN - CHART_HEIGHT) as i32),
        Size::new(w - 2 * CHART_MARGIN, CHART_HEIGHT),
    );
    draw_chart(display, chart_area, view.chart, trace_color(view.quantity), view.threshold);
}

// =============================================================================
// Unit Tests
// =============================================================================

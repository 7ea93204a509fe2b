//! Low-level drawing primitives shared across widgets.
//!
//! # Feature Flags
//!
//! - **`simple-outline`**: 2-pass shadow instead of the 8-pass outline in
//!   [`draw_value_with_outline`].

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Text, TextStyle};

use crate::chart::ChartBuffer;
use crate::colors::{BLACK, GRAY, WHITE};

/// Smallest vertical range a chart is scaled to, so a flat trace stays flat.
const MIN_CHART_RANGE: f32 = 1.0;

/// Fill a cell's background with a 2px inset.
pub fn draw_cell_background<D>(
    display: &mut D,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    bg_color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if w < 4 || h < 4 {
        return;
    }
    Rectangle::new(Point::new(x as i32 + 2, y as i32 + 2), Size::new(w - 4, h - 4))
        .into_styled(PrimitiveStyle::with_fill(bg_color))
        .draw(display)
        .ok();
}

/// Map a chart value to a screen row inside `area`. The scale always
/// includes zero so the baseline sits at the bottom edge.
fn chart_row(
    value: f32,
    top: f32,
    area: &Rectangle,
) -> i32 {
    let height = area.size.height as i32;
    let scaled = (value.max(0.0) / top).clamp(0.0, 1.0);
    area.top_left.y + height - 1 - (scaled * (height - 1) as f32) as i32
}

/// Draw a chart buffer as a polyline, oldest point on the left.
///
/// The vertical scale runs from 0 to the buffer maximum; `threshold`, when
/// set, is drawn as a dim horizontal guide.
pub fn draw_chart<D>(
    display: &mut D,
    area: Rectangle,
    chart: &ChartBuffer,
    color: Rgb565,
    threshold: Option<f32>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let count = chart.len();
    if count < 2 || area.size.width < 4 || area.size.height < 4 {
        return;
    }

    let (_, max) = chart.min_max();
    let top = threshold.map_or(max, |t| t.max(max)).max(MIN_CHART_RANGE);

    if let Some(level) = threshold {
        let y = chart_row(level, top, &area);
        let right = area.top_left.x + area.size.width as i32 - 1;
        Line::new(Point::new(area.top_left.x, y), Point::new(right, y))
            .into_styled(PrimitiveStyle::with_stroke(GRAY, 1))
            .draw(display)
            .ok();
    }

    let span = area.size.width as usize - 1;
    let line_style = PrimitiveStyle::with_stroke(color, 1);

    let mut prev: Option<Point> = None;
    for (i, value) in chart.iter().enumerate() {
        let point = Point::new(
            area.top_left.x + (i * span / (count - 1)) as i32,
            chart_row(value, top, &area),
        );
        if let Some(prev) = prev {
            Line::new(prev, point).into_styled(line_style).draw(display).ok();
        }
        prev = Some(point);
    }
}

// =============================================================================
// Text Outline Drawing
// =============================================================================

/// BLACK for light text, WHITE for dark text (ITU-R BT.601 luma).
#[inline]
fn outline_color_for_text(text_color: Rgb565) -> Rgb565 {
    let raw = text_color.into_storage();
    let r5 = u32::from((raw >> 11) & 0x1F);
    let g6 = u32::from((raw >> 5) & 0x3F);
    let b5 = u32::from(raw & 0x1F);
    let r8 = (r5 << 3) | (r5 >> 2);
    let g8 = (g6 << 2) | (g6 >> 4);
    let b8 = (b5 << 3) | (b5 >> 2);
    let luma = (r8 * 77 + g8 * 150 + b8 * 29) >> 8;

    if luma >= 128 { BLACK } else { WHITE }
}

/// Draw text with a contrasting outline so it reads over the red alert fill.
pub fn draw_value_with_outline<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    text_color: Rgb565,
    text_style: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let outline_style = MonoTextStyle::new(font, outline_color_for_text(text_color));
    let main_style = MonoTextStyle::new(font, text_color);

    #[cfg(feature = "simple-outline")]
    const OFFSETS: [(i32, i32); 2] = [(1, 1), (1, 0)];

    #[cfg(not(feature = "simple-outline"))]
    const OFFSETS: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

    for (dx, dy) in OFFSETS {
        Text::with_text_style(text, position + Point::new(dx, dy), outline_style, text_style)
            .draw(display)
            .ok();
    }
    Text::with_text_style(text, position, main_style, text_style)
        .draw(display)
        .ok();
}


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::test_canvas::Canvas;
    use super::*;
    use crate::colors::{PHOSPHOR, RED};

    #[test]
    fn test_outline_color_contrast() {
        assert_eq!(outline_color_for_text(WHITE), BLACK);
        assert_eq!(outline_color_for_text(BLACK), WHITE);
    }

    #[test]
    fn test_flat_zero_chart_sits_on_bottom_edge() {
        let mut canvas = Canvas::new();
        let area = Rectangle::new(Point::new(10, 10), Size::new(50, 20));
        draw_chart(&mut canvas, area, &ChartBuffer::new(10), PHOSPHOR, None);

        assert_eq!(canvas.at(10, 29), PHOSPHOR);
        assert_eq!(canvas.at(59, 29), PHOSPHOR);
        assert_eq!(canvas.at(30, 20), BLACK);
    }

    #[test]
    fn test_peak_reaches_top_edge() {
        let mut canvas = Canvas::new();
        let area = Rectangle::new(Point::new(0, 100), Size::new(40, 30));
        let mut chart = ChartBuffer::new(5);
        chart.push(25.0);
        draw_chart(&mut canvas, area, &chart, PHOSPHOR, None);

        // Latest point is the maximum: right edge, top row
        assert_eq!(canvas.at(39, 100), PHOSPHOR);
    }

    #[test]
    fn test_threshold_guide_drawn() {
        let mut canvas = Canvas::new();
        let area = Rectangle::new(Point::new(0, 0), Size::new(40, 21));
        draw_chart(&mut canvas, area, &ChartBuffer::new(5), RED, Some(10.0));
        // Threshold is the scale top, so the guide runs along the first row
        assert_eq!(canvas.at(20, 0), GRAY);
    }

    #[test]
    fn test_tiny_area_draws_nothing() {
        let mut canvas = Canvas::new();
        draw_chart(
            &mut canvas,
            Rectangle::new(Point::zero(), Size::new(2, 2)),
            &ChartBuffer::new(5),
            PHOSPHOR,
            None,
        );
        draw_cell_background(&mut canvas, 0, 0, 3, 3, RED);
        assert_eq!(canvas.count(BLACK), canvas.pixels.len());
    }
}

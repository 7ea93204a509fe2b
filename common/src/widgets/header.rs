//! Header bar, status line and region dividers.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{BLACK, GRAY, LIGHT_GRAY};
use crate::layout::{CELL_WIDTH, CELL_Y, HEADER_HEIGHT, SCREEN_WIDTH, SPECTRUM_Y, STATUS_HEIGHT, STATUS_Y};
use crate::styles::{LABEL_FONT, LABEL_STYLE_DIM, LEFT_ALIGNED, RIGHT_ALIGNED, TITLE_STYLE_WHITE};

const HEADER_TITLE_POS: Point = Point::new(6, 18);
const HEADER_MODE_POS: Point = Point::new((SCREEN_WIDTH - 6) as i32, 16);
const HEADER_RECT_SIZE: Size = Size::new(SCREEN_WIDTH, HEADER_HEIGHT);

const STATUS_RECT_POS: Point = Point::new(0, STATUS_Y as i32);
const STATUS_RECT_SIZE: Size = Size::new(SCREEN_WIDTH, STATUS_HEIGHT);
const STATUS_TEXT_POS: Point = Point::new(6, STATUS_Y as i32 + 15);

const DIV_CELLS_START: Point = Point::new(CELL_WIDTH as i32, CELL_Y as i32);
const DIV_CELLS_END: Point = Point::new(CELL_WIDTH as i32, SPECTRUM_Y as i32);
const DIV_SPECTRUM_START: Point = Point::new(0, SPECTRUM_Y as i32);
const DIV_SPECTRUM_END: Point = Point::new((SCREEN_WIDTH - 1) as i32, SPECTRUM_Y as i32);
const DIV_STATUS_START: Point = Point::new(0, STATUS_Y as i32);
const DIV_STATUS_END: Point = Point::new((SCREEN_WIDTH - 1) as i32, STATUS_Y as i32);

const HEADER_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BLACK);
const DIVIDER_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(GRAY, 1);

/// Title on the left, active mode tag on the right.
pub fn draw_header<D>(
    display: &mut D,
    mode: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::zero(), HEADER_RECT_SIZE)
        .into_styled(HEADER_FILL)
        .draw(display)
        .ok();
    Text::with_text_style("GHOST DETECTOR", HEADER_TITLE_POS, TITLE_STYLE_WHITE, LEFT_ALIGNED)
        .draw(display)
        .ok();
    Text::with_text_style(mode, HEADER_MODE_POS, LABEL_STYLE_DIM, RIGHT_ALIGNED)
        .draw(display)
        .ok();
}

/// Bottom status line.
pub fn draw_status_line<D>(
    display: &mut D,
    text: &str,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(STATUS_RECT_POS, STATUS_RECT_SIZE)
        .into_styled(HEADER_FILL)
        .draw(display)
        .ok();
    Text::with_text_style(text, STATUS_TEXT_POS, MonoTextStyle::new(LABEL_FONT, color), LEFT_ALIGNED)
        .draw(display)
        .ok();
}

/// Status line in the default color.
pub fn draw_status<D>(
    display: &mut D,
    text: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_status_line(display, text, LIGHT_GRAY);
}

pub fn draw_dividers<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    for (start, end) in [
        (DIV_CELLS_START, DIV_CELLS_END),
        (DIV_SPECTRUM_START, DIV_SPECTRUM_END),
        (DIV_STATUS_START, DIV_STATUS_END),
    ] {
        Line::new(start, end).into_styled(DIVIDER_STYLE).draw(display).ok();
    }
}

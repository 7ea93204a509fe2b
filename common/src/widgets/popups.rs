//! Overlays: the alert frame and short non-modal message popups.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use embedded_graphics::text::Text;

use super::primitives::draw_value_with_outline;
use crate::colors::{RED, WHITE};
use crate::layout::{CENTER_X, CENTER_Y, HEADER_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH, SPECTRUM_Y};
use crate::styles::{BANNER_FONT, CENTERED, TITLE_STYLE_WHITE};

/// Thickness of the red frame shown while the alert is active.
pub const ALERT_FRAME: u32 = 4;

const POPUP_WIDTH: u32 = 180;
const POPUP_HEIGHT: u32 = 50;
const POPUP_X: i32 = (SCREEN_WIDTH - POPUP_WIDTH) as i32 / 2;
const POPUP_Y: i32 = (SCREEN_HEIGHT - POPUP_HEIGHT) as i32 / 2;

const POPUP_BORDER_POS: Point = Point::new(POPUP_X - 3, POPUP_Y - 3);
const POPUP_BORDER_SIZE: Size = Size::new(POPUP_WIDTH + 6, POPUP_HEIGHT + 6);
const POPUP_BG_POS: Point = Point::new(POPUP_X, POPUP_Y);
const POPUP_BG_SIZE: Size = Size::new(POPUP_WIDTH, POPUP_HEIGHT);
const POPUP_TEXT_POS: Point = Point::new(CENTER_X, CENTER_Y + 5);

/// Banner sits on the divider between cells and spectrum.
const BANNER_POS: Point = Point::new(CENTER_X, SPECTRUM_Y as i32 + 6);

const WHITE_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(WHITE);
const RED_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(RED);

/// Red frame around the detector area plus a "GHOST DETECTED" banner.
pub fn draw_alert_overlay<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    let frame = PrimitiveStyleBuilder::new()
        .stroke_color(RED)
        .stroke_width(ALERT_FRAME)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    Rectangle::new(
        Point::new(0, HEADER_HEIGHT as i32),
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT - HEADER_HEIGHT),
    )
    .into_styled(frame)
    .draw(display)
    .ok();

    draw_value_with_outline(display, "GHOST DETECTED", BANNER_POS, BANNER_FONT, RED, CENTERED);
}

/// Centered popup with a white border and red fill.
pub fn draw_message_popup<D>(
    display: &mut D,
    message: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(POPUP_BORDER_POS, POPUP_BORDER_SIZE)
        .into_styled(WHITE_FILL)
        .draw(display)
        .ok();
    Rectangle::new(POPUP_BG_POS, POPUP_BG_SIZE)
        .into_styled(RED_FILL)
        .draw(display)
        .ok();
    Text::with_text_style(message, POPUP_TEXT_POS, TITLE_STYLE_WHITE, CENTERED)
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

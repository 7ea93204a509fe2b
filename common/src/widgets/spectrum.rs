//! Microphone spectrum bars.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{BLACK, ORANGE};
use crate::config::SPECTRUM_BARS;
use crate::layout::{SCREEN_WIDTH, SPECTRUM_HEIGHT, SPECTRUM_Y};
use crate::styles::{CENTERED, LABEL_STYLE_DIM};

const BAR_GAP: u32 = 2;
const SIDE_MARGIN: u32 = 8;
const BAR_WIDTH: u32 = (SCREEN_WIDTH - 2 * SIDE_MARGIN) / SPECTRUM_BARS as u32 - BAR_GAP;
/// Tallest bar, leaving room above for the alert banner.
const BAR_MAX_HEIGHT: u32 = SPECTRUM_HEIGHT - 24;
const BAR_BOTTOM: i32 = (SPECTRUM_Y + SPECTRUM_HEIGHT) as i32 - 4;

const AREA_POS: Point = Point::new(1, SPECTRUM_Y as i32 + 1);
const AREA_SIZE: Size = Size::new(SCREEN_WIDTH - 2, SPECTRUM_HEIGHT - 2);
const IDLE_TEXT_POS: Point = Point::new((SCREEN_WIDTH / 2) as i32, BAR_BOTTOM - 10);

const CLEAR_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BLACK);
const BAR_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(ORANGE);

/// Bar height in pixels for a byte magnitude.
pub const fn bar_height(magnitude: u8) -> u32 { magnitude as u32 * BAR_MAX_HEIGHT / u8::MAX as u32 }

/// Draw the first [`SPECTRUM_BARS`] bins; `None` shows the idle hint.
pub fn draw_spectrum<D>(
    display: &mut D,
    bins: Option<&[u8]>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(AREA_POS, AREA_SIZE)
        .into_styled(CLEAR_FILL)
        .draw(display)
        .ok();

    let Some(bins) = bins else {
        Text::with_text_style("press M for microphone", IDLE_TEXT_POS, LABEL_STYLE_DIM, CENTERED)
            .draw(display)
            .ok();
        return;
    };

    for (i, &magnitude) in bins.iter().take(SPECTRUM_BARS).enumerate() {
        let height = bar_height(magnitude);
        if height == 0 {
            continue;
        }
        let x = (SIDE_MARGIN + i as u32 * (BAR_WIDTH + BAR_GAP)) as i32;
        Rectangle::new(Point::new(x, BAR_BOTTOM - height as i32), Size::new(BAR_WIDTH, height))
            .into_styled(BAR_FILL)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Detector page composition.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use ghost_common::colors::{BLACK, LIGHT_GRAY, RED, YELLOW};
use ghost_common::widgets::{
    CellView,
    draw_alert_overlay,
    draw_dividers,
    draw_header,
    draw_message_popup,
    draw_quantity_cell,
    draw_spectrum,
    draw_status_line,
};
use ghost_common::{Detector, Quantity};

use crate::popup::Popup;
use crate::sink::ScreenSink;

/// Status line color: red while alerting, yellow while calibrating.
pub fn status_color(
    alert: bool,
    calibrating: bool,
) -> Rgb565 {
    if alert {
        RED
    } else if calibrating {
        YELLOW
    } else {
        LIGHT_GRAY
    }
}

/// Draw the full detector page for one frame.
pub fn draw_detector_page<D>(
    display: &mut D,
    detector: &Detector,
    sink: &ScreenSink,
    spectrum: Option<&[u8]>,
    popup: Option<Popup>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();
    draw_header(display, detector.config().profile.name());

    let calibration = detector.calibration();
    let alert = sink.alert();
    for quantity in Quantity::ALL {
        let calibrating = calibration.is_calibrating(quantity);
        // Only the magnetic field is alerted on, so only it gets a guide
        let threshold = (quantity == Quantity::MagneticField && !calibrating)
            .then(|| detector.policy().threshold(calibration.baseline(quantity)));
        let view = CellView {
            quantity,
            value: sink.value(quantity),
            chart: sink.chart(quantity),
            status: sink.sensor_status(quantity),
            threshold,
            calibrating,
            alert,
        };
        draw_quantity_cell(display, &view);
    }

    draw_spectrum(display, spectrum);
    draw_status_line(
        display,
        sink.status_text(),
        status_color(alert, calibration.any_calibrating()),
    );
    draw_dividers(display);

    if alert {
        draw_alert_overlay(display);
    }
    if let Some(popup) = popup {
        draw_message_popup(display, popup.message());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics_simulator::SimulatorDisplay;
    use ghost_common::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use ghost_common::sink::PresentationSink;
    use ghost_common::{DetectorConfig, Profile};

    use super::*;
    use crate::platform::{PlatformOptions, SimulatedPlatform, Tier};

    fn detector() -> Detector {
        let platform = SimulatedPlatform::new(PlatformOptions::new(Tier::Sensors));
        Detector::probe(DetectorConfig::for_profile(Profile::Magnetometer), &platform).unwrap()
    }

    fn red_pixels(display: &SimulatorDisplay<Rgb565>) -> usize {
        display.bounding_box().points().filter(|&p| display.get_pixel(p) == RED).count()
    }

    #[test]
    fn test_status_color_priority() {
        assert_eq!(status_color(true, true), RED);
        assert_eq!(status_color(false, true), YELLOW);
        assert_eq!(status_color(false, false), LIGHT_GRAY);
    }

    #[test]
    fn test_alert_adds_red_frame() {
        let detector = detector();
        let mut sink = ScreenSink::new(20);
        let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));

        draw_detector_page(&mut display, &detector, &sink, None, None);
        let calm = red_pixels(&display);

        sink.set_alert_active(true);
        draw_detector_page(&mut display, &detector, &sink, None, None);
        assert!(red_pixels(&display) > calm + 1000);
    }

    #[test]
    fn test_popup_is_drawn_on_top() {
        let detector = detector();
        let sink = ScreenSink::new(20);
        let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        draw_detector_page(&mut display, &detector, &sink, None, Some(Popup::MicOn(0)));
        assert!(red_pixels(&display) > 0);
    }

}

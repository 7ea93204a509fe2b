//! Presentation boundary and the status lines shown to the user.

use core::fmt::Write;

use heapless::String;

use crate::adapter::SensorStatus;
use crate::quantity::Quantity;

/// Maximum length of a status line.
pub const STATUS_LEN: usize = 64;

/// A formatted status line.
pub type StatusText = String<STATUS_LEN>;

/// Receives everything the pipeline wants shown.
pub trait PresentationSink {
    /// Latest value for a quantity, already clamped at 0.
    fn display_scalar(
        &mut self,
        quantity: Quantity,
        value: f32,
    );

    /// Append a point to the quantity's chart.
    fn push_chart_point(
        &mut self,
        quantity: Quantity,
        value: f32,
    );

    fn set_alert_active(
        &mut self,
        active: bool,
    );

    fn set_status_text(
        &mut self,
        text: &str,
    );

    /// Adapter status changed for a quantity.
    fn set_sensor_status(
        &mut self,
        _quantity: Quantity,
        _status: SensorStatus,
    ) {
    }
}

// =============================================================================
// Status Text
// =============================================================================

pub const STATUS_READY: &str = "ready, press calibrate to enable sensors";
pub const STATUS_CALIBRATING: &str = "calibrating, hold still";
pub const STATUS_CALIBRATED_DEFAULTS: &str = "calibrated with defaults";
pub const STATUS_CALIBRATION_FAILED: &str = "calibration failed, no reading available";
pub const STATUS_PERMISSION_DENIED: &str = "permission denied";
pub const STATUS_NO_SENSORS: &str = "no usable sensors";
pub const STATUS_STOPPED: &str = "sensors stopped";
pub const STATUS_MIC_ERROR: &str = "microphone error";

/// "sensors active (universal mode)"
pub fn sensors_active(mode: &str) -> StatusText {
    let mut text = StatusText::new();
    write!(text, "sensors active ({mode} mode)").ok();
    text
}

/// "calibrated (base: 12.3)"
pub fn calibrated(baseline: f32) -> StatusText {
    let mut text = StatusText::new();
    write!(text, "calibrated (base: {baseline:.1})").ok();
    text
}

/// Value as shown in a cell: clamped at 0, two decimals.
pub fn format_value(value: f32) -> String<16> {
    let mut text = String::new();
    let shown = if value.is_nan() { 0.0 } else { value.max(0.0) };
    write!(text, "{shown:.2}").ok();
    text
}

/// Short line for a degraded quantity, e.g. "EMF: N/A".
pub fn sensor_status_line(
    quantity: Quantity,
    status: SensorStatus,
) -> StatusText {
    let mut text = StatusText::new();
    write!(text, "{}: {}", quantity.label(), status.tag()).ok();
    text
}

// =============================================================================
// Unit Tests
// =============================================================================

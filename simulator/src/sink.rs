//! Screen-side presentation state.
//!
//! The detector pushes into [`ScreenSink`]; the renderer reads it back every
//! frame. Charts are prefilled so they scroll in from the right.

use ghost_common::adapter::SensorStatus;
use ghost_common::chart::ChartBuffer;
use ghost_common::quantity::Quantity;
use ghost_common::sink::{PresentationSink, STATUS_READY, StatusText};

#[derive(Debug)]
pub struct ScreenSink {
    values: [Option<f32>; Quantity::COUNT],
    charts: [ChartBuffer; Quantity::COUNT],
    statuses: [SensorStatus; Quantity::COUNT],
    alert: bool,
    status_text: StatusText,
    /// Count of status line changes, for the headless summary.
    status_changes: u32,
}

impl ScreenSink {
    pub fn new(history_depth: usize) -> Self {
        let mut status_text = StatusText::new();
        status_text.push_str(STATUS_READY).ok();
        Self {
            values: [None; Quantity::COUNT],
            charts: [ChartBuffer::new(history_depth), ChartBuffer::new(history_depth)],
            statuses: [SensorStatus::default(); Quantity::COUNT],
            alert: false,
            status_text,
            status_changes: 0,
        }
    }

    pub const fn value(
        &self,
        quantity: Quantity,
    ) -> Option<f32> {
        self.values[quantity.index()]
    }

    pub const fn chart(
        &self,
        quantity: Quantity,
    ) -> &ChartBuffer {
        &self.charts[quantity.index()]
    }

    pub const fn sensor_status(
        &self,
        quantity: Quantity,
    ) -> SensorStatus {
        self.statuses[quantity.index()]
    }

    pub const fn alert(&self) -> bool { self.alert }

    pub fn status_text(&self) -> &str { &self.status_text }

    pub const fn status_changes(&self) -> u32 { self.status_changes }
}

impl PresentationSink for ScreenSink {
    fn display_scalar(
        &mut self,
        quantity: Quantity,
        value: f32,
    ) {
        self.values[quantity.index()] = Some(value.max(0.0));
    }

    fn push_chart_point(
        &mut self,
        quantity: Quantity,
        value: f32,
    ) {
        self.charts[quantity.index()].push(value);
    }

    fn set_alert_active(
        &mut self,
        active: bool,
    ) {
        if active != self.alert {
            tracing::info!(active, "alert changed");
        }
        self.alert = active;
    }

    fn set_status_text(
        &mut self,
        text: &str,
    ) {
        tracing::info!(status = text);
        self.status_text.clear();
        // Long lines are cut at the status width
        for c in text.chars() {
            if self.status_text.push(c).is_err() {
                break;
            }
        }
        self.status_changes += 1;
    }

    fn set_sensor_status(
        &mut self,
        quantity: Quantity,
        status: SensorStatus,
    ) {
        self.statuses[quantity.index()] = status;
        if status == SensorStatus::Inactive {
            self.values[quantity.index()] = None;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

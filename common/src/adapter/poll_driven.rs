//! Poll-driven acquisition from magnetometer and accelerometer sensors.
//!
//! | Quantity | Preferred source | Fallback |
//! |----------|------------------|----------|
//! | Magnetic field | magnetometer @ 10 Hz, `‖B‖` | none (unsupported) |
//! | Vibration | linear acceleration @ 60 Hz, `‖a‖` | accelerometer @ 60 Hz, `|‖a‖ − g|` |

use super::{
    AdapterKind,
    AdapterOutputs,
    AdapterState,
    PlatformEvent,
    SensorAdapter,
    SensorPlatform,
    SensorSource,
    SensorStatus,
};
use crate::config::{ACCELEROMETER_RATE_HZ, MAGNETOMETER_RATE_HZ};
use crate::error::SensorError;
use crate::quantity::Quantity;
use crate::signal::gravity_compensated;

/// Quantity fed by a polling source.
const fn quantity_of(source: SensorSource) -> Option<Quantity> {
    match source {
        SensorSource::Magnetometer => Some(Quantity::MagneticField),
        SensorSource::LinearAcceleration | SensorSource::Accelerometer => Some(Quantity::Vibration),
        _ => None,
    }
}

/// Adapter for platforms exposing polling sensor objects.
#[derive(Debug, Default)]
pub struct PollDrivenAdapter {
    state: AdapterState,
    /// Which accelerometer variant feeds vibration, once started.
    vibration_source: Option<SensorSource>,
}

impl PollDrivenAdapter {
    pub fn new() -> Self { Self::default() }

    /// Accelerometer variant in use, if vibration started.
    pub const fn vibration_source(&self) -> Option<SensorSource> { self.vibration_source }

    fn start_magnetometer(
        &mut self,
        platform: &mut dyn SensorPlatform,
        supported: bool,
        out: &mut AdapterOutputs,
    ) {
        let status = if !supported {
            SensorStatus::Unsupported
        } else {
            match self
                .state
                .subscribe(platform, SensorSource::Magnetometer, Some(MAGNETOMETER_RATE_HZ))
            {
                Ok(()) => SensorStatus::Active,
                Err(err) => SensorStatus::from(err),
            }
        };
        self.state.set_status(Quantity::MagneticField, status, out);
    }

    /// Try linear acceleration first, then the gravity-inclusive sensor.
    /// A permission denial stops the fallback chain.
    fn start_vibration(
        &mut self,
        platform: &mut dyn SensorPlatform,
        linear: bool,
        raw: bool,
        out: &mut AdapterOutputs,
    ) {
        let candidates = [
            (linear, SensorSource::LinearAcceleration),
            (raw, SensorSource::Accelerometer),
        ];

        let mut status = SensorStatus::Unsupported;
        for (supported, source) in candidates {
            if !supported {
                continue;
            }
            match self.state.subscribe(platform, source, Some(ACCELEROMETER_RATE_HZ)) {
                Ok(()) => {
                    self.vibration_source = Some(source);
                    status = SensorStatus::Active;
                    break;
                }
                Err(err @ SensorError::Unsupported(_)) => status = SensorStatus::from(err),
                Err(err) => {
                    status = SensorStatus::from(err);
                    break;
                }
            }
        }
        self.state.set_status(Quantity::Vibration, status, out);
    }
}

impl SensorAdapter for PollDrivenAdapter {
    fn kind(&self) -> AdapterKind { AdapterKind::PollDriven }

    fn start(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        let mut out = AdapterOutputs::new();
        let caps = platform.capabilities();

        self.vibration_source = None;
        self.start_magnetometer(platform, caps.magnetometer, &mut out);
        self.start_vibration(platform, caps.linear_acceleration, caps.accelerometer, &mut out);
        out
    }

    fn stop(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        self.vibration_source = None;
        self.state.shutdown(platform)
    }

    fn handle(
        &mut self,
        event: &PlatformEvent,
        timestamp_ms: u64,
    ) -> AdapterOutputs {
        let mut out = AdapterOutputs::new();

        match *event {
            PlatformEvent::Reading { source, vector } => {
                if !self.state.is_subscribed(source) {
                    return out;
                }
                let (quantity, value) = match source {
                    SensorSource::Magnetometer => (Quantity::MagneticField, vector.magnitude()),
                    SensorSource::LinearAcceleration => (Quantity::Vibration, vector.magnitude()),
                    SensorSource::Accelerometer => (Quantity::Vibration, gravity_compensated(&vector)),
                    SensorSource::DeviceMotion | SensorSource::DeviceOrientation => return out,
                };
                self.state.record(quantity, value, timestamp_ms, &mut out);
            }
            PlatformEvent::Fault { source, cause } => {
                if let Some(quantity) = quantity_of(source)
                    && self.state.is_subscribed(source)
                {
                    self.state.fault(quantity, source, cause, &mut out);
                }
            }
            PlatformEvent::Motion { .. } | PlatformEvent::Orientation { .. } => {}
        }

        out
    }

    fn status(
        &self,
        quantity: Quantity,
    ) -> SensorStatus {
        self.state.status[quantity.index()]
    }

    fn current(
        &self,
        quantity: Quantity,
    ) -> Option<f32> {
        self.state.current[quantity.index()]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

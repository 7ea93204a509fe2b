//! Event-driven acquisition from device motion and orientation events.
//!
//! This device class has no magnetometer. Heading jitter near magnetic
//! sources is used as the EMF proxy instead:
//!
//! ```text
//! alpha[n-1], alpha[n] ──wrap──▶ Δ ∈ [0, 180] ──× gain, clamp──▶ EMF
//! ```

use super::{
    AdapterKind,
    AdapterOutputs,
    AdapterState,
    Permission,
    PlatformEvent,
    SensorAdapter,
    SensorPlatform,
    SensorSource,
    SensorStatus,
};
use crate::quantity::Quantity;
use crate::signal::{heading_delta, orientation_proxy};

/// Quantity fed by an event source.
const fn quantity_of(source: SensorSource) -> Option<Quantity> {
    match source {
        SensorSource::DeviceMotion => Some(Quantity::Vibration),
        SensorSource::DeviceOrientation => Some(Quantity::MagneticField),
        _ => None,
    }
}

/// Adapter for platforms exposing only motion/orientation events.
#[derive(Debug, Default)]
pub struct EventDrivenAdapter {
    state: AdapterState,
    /// Previous compass heading, `None` until the first orientation event.
    last_alpha: Option<f32>,
}

impl EventDrivenAdapter {
    pub fn new() -> Self { Self::default() }

    fn start_source(
        &mut self,
        platform: &mut dyn SensorPlatform,
        supported: bool,
        source: SensorSource,
        quantity: Quantity,
        out: &mut AdapterOutputs,
    ) {
        let status = if !supported {
            SensorStatus::Unsupported
        } else {
            match self.state.subscribe(platform, source, None) {
                Ok(()) => SensorStatus::Active,
                Err(err) => SensorStatus::from(err),
            }
        };
        self.state.set_status(quantity, status, out);
    }
}

impl SensorAdapter for EventDrivenAdapter {
    fn kind(&self) -> AdapterKind { AdapterKind::EventDriven }

    fn start(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        let mut out = AdapterOutputs::new();
        let caps = platform.capabilities();

        if caps.motion_permission_required && platform.request_motion_permission() == Permission::Denied {
            for quantity in Quantity::ALL {
                self.state.set_status(quantity, SensorStatus::PermissionDenied, &mut out);
            }
            return out;
        }

        self.last_alpha = None;
        self.start_source(
            platform,
            caps.motion_events,
            SensorSource::DeviceMotion,
            Quantity::Vibration,
            &mut out,
        );
        self.start_source(
            platform,
            caps.orientation_events,
            SensorSource::DeviceOrientation,
            Quantity::MagneticField,
            &mut out,
        );
        out
    }

    fn stop(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        self.last_alpha = None;
        self.state.shutdown(platform)
    }

    fn handle(
        &mut self,
        event: &PlatformEvent,
        timestamp_ms: u64,
    ) -> AdapterOutputs {
        let mut out = AdapterOutputs::new();

        match *event {
            PlatformEvent::Motion {
                acceleration,
                including_gravity,
            } => {
                if !self.state.is_subscribed(SensorSource::DeviceMotion) {
                    return out;
                }
                // Gravity-excluded acceleration is missing on some hardware
                if let Some(accel) = acceleration.or(including_gravity) {
                    self.state.record(Quantity::Vibration, accel.magnitude(), timestamp_ms, &mut out);
                }
            }
            PlatformEvent::Orientation { alpha: Some(alpha) } => {
                if !self.state.is_subscribed(SensorSource::DeviceOrientation) {
                    return out;
                }
                if let Some(previous) = self.last_alpha {
                    let emf = orientation_proxy(heading_delta(previous, alpha));
                    self.state.record(Quantity::MagneticField, emf, timestamp_ms, &mut out);
                }
                self.last_alpha = Some(alpha);
            }
            PlatformEvent::Fault { source, cause } => {
                if let Some(quantity) = quantity_of(source)
                    && self.state.is_subscribed(source)
                {
                    self.state.fault(quantity, source, cause, &mut out);
                }
            }
            PlatformEvent::Orientation { alpha: None } | PlatformEvent::Reading { .. } => {}
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterOutput;
    use crate::adapter::test_platform::ScriptedPlatform;
    use crate::config::ORIENTATION_PROXY_MAX;
    use crate::error::{FaultCause, SensorError};
    use crate::signal::Vector3;

    fn readings(out: &AdapterOutputs) -> std::vec::Vec<(Quantity, f32)> {
        out.iter()
            .filter_map(|o| match o {
                AdapterOutput::Reading(r) => Some((r.quantity, r.value)),
                AdapterOutput::Status(..) => None,
            })
            .collect()
    }

    fn started() -> (EventDrivenAdapter, ScriptedPlatform) {
        let mut platform = ScriptedPlatform::events_only();
        let mut adapter = EventDrivenAdapter::new();
        adapter.start(&mut platform);
        (adapter, platform)
    }

    #[test]
    fn test_start_subscribes_both_sources() {
        let mut platform = ScriptedPlatform::events_only();
        let mut adapter = EventDrivenAdapter::new();
        let out = adapter.start(&mut platform);

        assert!(platform.is_active(SensorSource::DeviceMotion));
        assert!(platform.is_active(SensorSource::DeviceOrientation));
        assert_eq!(adapter.status(Quantity::Vibration), SensorStatus::Active);
        assert_eq!(adapter.status(Quantity::MagneticField), SensorStatus::Active);
        assert_eq!(out.len(), 2);
        assert_eq!(platform.permission_requests, 0);
    }

    #[test]
    fn test_permission_denied_reports_without_subscribing() {
        let mut platform = ScriptedPlatform::events_only();
        platform.caps.motion_permission_required = true;
        platform.permission = Permission::Denied;

        let mut adapter = EventDrivenAdapter::new();
        adapter.start(&mut platform);

        assert_eq!(platform.permission_requests, 1);
        assert!(platform.active.is_empty());
        assert_eq!(adapter.status(Quantity::Vibration), SensorStatus::PermissionDenied);
        assert_eq!(adapter.status(Quantity::MagneticField), SensorStatus::PermissionDenied);
    }

    #[test]
    fn test_permission_granted_starts() {
        let mut platform = ScriptedPlatform::events_only();
        platform.caps.motion_permission_required = true;
        platform.permission = Permission::Granted;

        let mut adapter = EventDrivenAdapter::new();
        adapter.start(&mut platform);
        assert_eq!(adapter.status(Quantity::MagneticField), SensorStatus::Active);
    }

    #[test]
    fn test_missing_orientation_degrades_only_magnetic() {
        let mut platform = ScriptedPlatform::events_only();
        platform.caps.orientation_events = false;

        let mut adapter = EventDrivenAdapter::new();
        adapter.start(&mut platform);
        assert_eq!(adapter.status(Quantity::MagneticField), SensorStatus::Unsupported);
        assert_eq!(adapter.status(Quantity::Vibration), SensorStatus::Active);
    }

    #[test]
    fn test_subscription_error_maps_to_status() {
        let mut platform = ScriptedPlatform::events_only();
        platform
            .failing
            .push((SensorSource::DeviceMotion, SensorError::PermissionDenied(SensorSource::DeviceMotion)));

        let mut adapter = EventDrivenAdapter::new();
        adapter.start(&mut platform);
        assert_eq!(adapter.status(Quantity::Vibration), SensorStatus::PermissionDenied);
        assert_eq!(adapter.status(Quantity::MagneticField), SensorStatus::Active);
    }

    #[test]
    fn test_vibration_prefers_gravity_excluded() {
        let (mut adapter, _) = started();
        let out = adapter.handle(
            &PlatformEvent::Motion {
                acceleration: Some(Vector3::new(3.0, 4.0, 0.0)),
                including_gravity: Some(Vector3::new(0.0, 0.0, 9.81)),
            },
            10,
        );
        let r = readings(&out);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].0, Quantity::Vibration);
        assert!((r[0].1 - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_vibration_falls_back_to_gravity_inclusive() {
        let (mut adapter, _) = started();
        let out = adapter.handle(
            &PlatformEvent::Motion {
                acceleration: None,
                including_gravity: Some(Vector3::new(0.0, 0.0, 9.81)),
            },
            10,
        );
        let r = readings(&out);
        assert!((r[0].1 - 9.81).abs() < 1e-4);

        let out = adapter.handle(
            &PlatformEvent::Motion {
                acceleration: None,
                including_gravity: None,
            },
            20,
        );
        assert!(readings(&out).is_empty());
    }

    #[test]
    fn test_first_heading_only_primes() {
        let (mut adapter, _) = started();
        let out = adapter.handle(&PlatformEvent::Orientation { alpha: Some(350.0) }, 0);
        assert!(readings(&out).is_empty());
        assert_eq!(adapter.current(Quantity::MagneticField), None);
    }

    #[test]
    fn test_heading_proxy_wraps_and_clamps() {
        let (mut adapter, _) = started();
        adapter.handle(&PlatformEvent::Orientation { alpha: Some(350.0) }, 0);

        // 350 -> 10 is a 20 degree change, 20 * 50 = 1000, clamped to 200
        let out = adapter.handle(&PlatformEvent::Orientation { alpha: Some(10.0) }, 16);
        let r = readings(&out);
        assert_eq!(r, [(Quantity::MagneticField, ORIENTATION_PROXY_MAX)]);

        // 10 -> 10.1 is 0.1 degree, 0.1 * 50 = 5
        let out = adapter.handle(&PlatformEvent::Orientation { alpha: Some(10.1) }, 32);
        let r = readings(&out);
        assert!((r[0].1 - 5.0).abs() < 1e-2);
    }

    #[test]
    fn test_null_heading_is_ignored() {
        let (mut adapter, _) = started();
        adapter.handle(&PlatformEvent::Orientation { alpha: Some(100.0) }, 0);
        let out = adapter.handle(&PlatformEvent::Orientation { alpha: None }, 16);
        assert!(out.is_empty());

        // Previous heading survives the null event
        let out = adapter.handle(&PlatformEvent::Orientation { alpha: Some(100.0) }, 32);
        assert_eq!(readings(&out), [(Quantity::MagneticField, 0.0)]);
    }

    #[test]
    fn test_fault_keeps_last_value_and_recovers() {
        let (mut adapter, _) = started();
        adapter.handle(
            &PlatformEvent::Motion {
                acceleration: Some(Vector3::new(1.0, 0.0, 0.0)),
                including_gravity: None,
            },
            0,
        );

        let out = adapter.handle(
            &PlatformEvent::Fault {
                source: SensorSource::DeviceMotion,
                cause: FaultCause::NotReadable,
            },
            10,
        );
        assert_eq!(
            out.as_slice(),
            [AdapterOutput::Status(
                Quantity::Vibration,
                SensorStatus::Errored(FaultCause::NotReadable)
            )]
        );
        assert_eq!(adapter.current(Quantity::Vibration), Some(1.0));

        adapter.handle(
            &PlatformEvent::Motion {
                acceleration: Some(Vector3::new(2.0, 0.0, 0.0)),
                including_gravity: None,
            },
            20,
        );
        assert_eq!(adapter.status(Quantity::Vibration), SensorStatus::Active);
    }

    #[test]
    fn test_polling_readings_are_ignored() {
        let (mut adapter, _) = started();
        let out = adapter.handle(
            &PlatformEvent::Reading {
                source: SensorSource::Magnetometer,
                vector: Vector3::new(40.0, 0.0, 0.0),
            },
            0,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_stop_unsubscribes_and_ignores_late_events() {
        let (mut adapter, mut platform) = started();
        adapter.stop(&mut platform);

        assert!(platform.active.is_empty());
        assert_eq!(adapter.status(Quantity::Vibration), SensorStatus::Inactive);

        let out = adapter.handle(
            &PlatformEvent::Motion {
                acceleration: Some(Vector3::new(1.0, 1.0, 1.0)),
                including_gravity: None,
            },
            100,
        );
        assert!(out.is_empty());
    }
}

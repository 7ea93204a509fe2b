//! Sensor acquisition behind a uniform per-quantity contract.
//!
//! Two mutually exclusive strategies exist, picked once at start-up by
//! probing the platform's [`Capabilities`]:
//!
//! - [`EventDrivenAdapter`]: device motion + orientation events. Broadest
//!   compatibility; magnetic field is an orientation-instability proxy.
//! - [`PollDrivenAdapter`]: magnetometer and (linear) accelerometer sensors
//!   pushing readings at a fixed rate. Magnetic field is a real magnitude.
//!
//! Both report readings and status changes as [`AdapterOutput`]s. Failures
//! never propagate: each quantity degrades to a [`SensorStatus`] on its own.
//!
//! ```text
//! SensorPlatform ──PlatformEvent──▶ SensorAdapter ──AdapterOutput──▶ Detector
//!        ▲                               │
//!        └──── subscribe/unsubscribe ────┘
//! ```

mod event_driven;
mod poll_driven;

pub use event_driven::EventDrivenAdapter;
use heapless::Vec;
pub use poll_driven::PollDrivenAdapter;

use crate::error::{FaultCause, SensorError};
use crate::quantity::{Quantity, SensorReading};
use crate::signal::Vector3;

// =============================================================================
// Platform Interface
// =============================================================================

/// Raw sensor sources a platform may offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorSource {
    /// Push-on-change motion events (acceleration vectors).
    DeviceMotion,
    /// Push-on-change orientation events (compass heading).
    DeviceOrientation,
    /// Polling magnetometer (3-axis, uT).
    Magnetometer,
    /// Polling accelerometer with gravity removed.
    LinearAcceleration,
    /// Polling accelerometer including gravity.
    Accelerometer,
}

/// What the platform exposes, probed once before choosing a strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub motion_events: bool,
    pub orientation_events: bool,
    /// Motion/orientation events need an explicit user-granted permission.
    pub motion_permission_required: bool,
    pub magnetometer: bool,
    pub linear_acceleration: bool,
    pub accelerometer: bool,
}

/// Result of a motion permission request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The platform does not gate motion events behind a permission.
    NotRequired,
}

/// Event pushed by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlatformEvent {
    /// Device motion. Either vector may be missing on some hardware.
    Motion {
        acceleration: Option<Vector3>,
        including_gravity: Option<Vector3>,
    },
    /// Device orientation. `alpha` is the compass heading in degrees.
    Orientation { alpha: Option<f32> },
    /// A polling sensor produced a reading.
    Reading { source: SensorSource, vector: Vector3 },
    /// A started sensor failed asynchronously.
    Fault { source: SensorSource, cause: FaultCause },
}

/// Host platform providing sensor events (browser, simulator, test double).
pub trait SensorPlatform {
    /// Probe what the platform supports.
    fn capabilities(&self) -> Capabilities;

    /// Ask for motion/orientation access. Called only when
    /// [`Capabilities::motion_permission_required`] is set.
    fn request_motion_permission(&mut self) -> Permission;

    /// Start delivering events for `source`. `rate_hz` is the polling
    /// frequency for polling sensors and ignored for event sources.
    fn subscribe(
        &mut self,
        source: SensorSource,
        rate_hz: Option<u16>,
    ) -> Result<(), SensorError>;

    /// Stop delivering events for `source` and release its handle.
    fn unsubscribe(
        &mut self,
        source: SensorSource,
    );
}

// =============================================================================
// Adapter Contract
// =============================================================================

/// Per-quantity acquisition status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SensorStatus {
    /// Not started, or stopped.
    #[default]
    Inactive,
    Active,
    Unsupported,
    PermissionDenied,
    /// Runtime fault. The last good value stays displayed.
    Errored(FaultCause),
}

impl SensorStatus {
    /// Whether readings can still arrive for this quantity.
    pub const fn is_usable(self) -> bool { matches!(self, Self::Active | Self::Errored(_)) }

    /// Short tag for cells and status lines.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Inactive => "OFF",
            Self::Active => "OK",
            Self::Unsupported => "N/A",
            Self::PermissionDenied => "DENIED",
            Self::Errored(_) => "ERR",
        }
    }
}

impl From<SensorError> for SensorStatus {
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::Unsupported(_) => Self::Unsupported,
            SensorError::PermissionDenied(_) => Self::PermissionDenied,
            SensorError::ReadError {
                cause: FaultCause::NotAllowed,
                ..
            } => Self::PermissionDenied,
            SensorError::ReadError { cause, .. } => Self::Errored(cause),
        }
    }
}

/// Something the adapter wants the pipeline to know.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdapterOutput {
    Reading(SensorReading),
    Status(Quantity, SensorStatus),
}

/// Outputs of one adapter call. One event yields at most one reading plus a
/// status change; `start`/`stop` yield one status per quantity.
pub type AdapterOutputs = Vec<AdapterOutput, 4>;

/// Which acquisition strategy is in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    EventDriven,
    PollDriven,
}

impl AdapterKind {
    /// Pick the richest strategy the platform supports. A magnetometer means
    /// the polling model is available; everything else falls back to events.
    pub const fn select(caps: &Capabilities) -> Self {
        if caps.magnetometer { Self::PollDriven } else { Self::EventDriven }
    }

    /// Mode name for status lines.
    pub const fn mode_name(self) -> &'static str {
        match self {
            Self::EventDriven => "universal",
            Self::PollDriven => "magnetometer",
        }
    }
}

/// Uniform "current scalar reading" contract over both strategies.
pub trait SensorAdapter {
    /// Strategy implemented by this adapter.
    fn kind(&self) -> AdapterKind;

    /// Subscribe to the platform. Unavailable quantities degrade to a
    /// status; this never fails as a whole.
    fn start(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs;

    /// Unsubscribe every started source and return to `Inactive`.
    fn stop(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs;

    /// Translate one platform event into readings/status changes.
    fn handle(
        &mut self,
        event: &PlatformEvent,
        timestamp_ms: u64,
    ) -> AdapterOutputs;

    /// Current status of a quantity.
    fn status(
        &self,
        quantity: Quantity,
    ) -> SensorStatus;

    /// Last valid scalar for a quantity, if any arrived since start.
    fn current(
        &self,
        quantity: Quantity,
    ) -> Option<f32>;
}

// =============================================================================
// Shared Per-Quantity State
// =============================================================================

/// Status and last value per quantity, shared by both adapters.
#[derive(Clone, Debug, Default)]
struct AdapterState {
    status: [SensorStatus; Quantity::COUNT],
    current: [Option<f32>; Quantity::COUNT],
    subscribed: Vec<SensorSource, 3>,
}

impl AdapterState {
    /// Set a status, recording an output only if it changed.
    fn set_status(
        &mut self,
        quantity: Quantity,
        status: SensorStatus,
        out: &mut AdapterOutputs,
    ) {
        let slot = &mut self.status[quantity.index()];
        if *slot != status {
            *slot = status;
            out.push(AdapterOutput::Status(quantity, status)).ok();
        }
    }

    /// Store a fresh value and emit it. A reading proves the sensor works
    /// again, so an errored quantity returns to `Active`.
    fn record(
        &mut self,
        quantity: Quantity,
        value: f32,
        timestamp_ms: u64,
        out: &mut AdapterOutputs,
    ) {
        let reading = SensorReading::new(quantity, value, timestamp_ms);
        self.current[quantity.index()] = Some(reading.value);
        self.set_status(quantity, SensorStatus::Active, out);
        out.push(AdapterOutput::Reading(reading)).ok();
    }

    /// Subscribe and remember the source for shutdown.
    fn subscribe(
        &mut self,
        platform: &mut dyn SensorPlatform,
        source: SensorSource,
        rate_hz: Option<u16>,
    ) -> Result<(), SensorError> {
        platform.subscribe(source, rate_hz)?;
        if !self.subscribed.contains(&source) {
            self.subscribed.push(source).ok();
        }
        Ok(())
    }

    fn is_subscribed(
        &self,
        source: SensorSource,
    ) -> bool {
        self.subscribed.contains(&source)
    }

    /// Unsubscribe everything and reset to `Inactive`.
    fn shutdown(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        for source in self.subscribed.iter() {
            platform.unsubscribe(*source);
        }
        self.subscribed.clear();

        let mut out = AdapterOutputs::new();
        for quantity in Quantity::ALL {
            self.current[quantity.index()] = None;
            self.set_status(quantity, SensorStatus::Inactive, &mut out);
        }
        out
    }

    /// Apply an asynchronous fault. The last value is kept.
    fn fault(
        &mut self,
        quantity: Quantity,
        source: SensorSource,
        cause: FaultCause,
        out: &mut AdapterOutputs,
    ) {
        let status = SensorStatus::from(SensorError::ReadError { sensor: source, cause });
        self.set_status(quantity, status, out);
    }
}

// =============================================================================
// Strategy Dispatch
// =============================================================================

/// The adapter chosen by capability probing.
#[derive(Debug)]
pub enum AnyAdapter {
    Event(EventDrivenAdapter),
    Poll(PollDrivenAdapter),
}

impl AnyAdapter {
    /// Probe the platform once and build the matching adapter.
    pub fn probe(platform: &dyn SensorPlatform) -> Self { Self::for_kind(AdapterKind::select(&platform.capabilities())) }

    /// Build a specific strategy, bypassing probing.
    pub fn for_kind(kind: AdapterKind) -> Self {
        match kind {
            AdapterKind::EventDriven => Self::Event(EventDrivenAdapter::new()),
            AdapterKind::PollDriven => Self::Poll(PollDrivenAdapter::new()),
        }
    }

    fn inner(&self) -> &dyn SensorAdapter {
        match self {
            Self::Event(a) => a,
            Self::Poll(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SensorAdapter {
        match self {
            Self::Event(a) => a,
            Self::Poll(a) => a,
        }
    }
}

impl SensorAdapter for AnyAdapter {
    fn kind(&self) -> AdapterKind { self.inner().kind() }

    fn start(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        self.inner_mut().start(platform)
    }

    fn stop(
        &mut self,
        platform: &mut dyn SensorPlatform,
    ) -> AdapterOutputs {
        self.inner_mut().stop(platform)
    }

    fn handle(
        &mut self,
        event: &PlatformEvent,
        timestamp_ms: u64,
    ) -> AdapterOutputs {
        self.inner_mut().handle(event, timestamp_ms)
    }

    fn status(
        &self,
        quantity: Quantity,
    ) -> SensorStatus {
        self.inner().status(quantity)
    }

    fn current(
        &self,
        quantity: Quantity,
    ) -> Option<f32> {
        self.inner().current(quantity)
    }
}

// =============================================================================
// Test Support
// =============================================================================


#[cfg(test)]
mod tests {
    use super::test_platform::ScriptedPlatform;
    use super::*;

    #[test]
    fn test_select_prefers_polling_with_magnetometer() {
        let caps = Capabilities {
            magnetometer: true,
            ..Capabilities::default()
        };
        assert_eq!(AdapterKind::select(&caps), AdapterKind::PollDriven);
    }

    #[test]
    fn test_select_falls_back_to_events() {
        let caps = Capabilities {
            motion_events: true,
            orientation_events: true,
            accelerometer: true,
            ..Capabilities::default()
        };
        assert_eq!(AdapterKind::select(&caps), AdapterKind::EventDriven);
        assert_eq!(AdapterKind::select(&Capabilities::default()), AdapterKind::EventDriven);
    }

    #[test]
    fn test_probe_builds_matching_adapter() {
        let platform = ScriptedPlatform::full_sensors();
        assert_eq!(AnyAdapter::probe(&platform).kind(), AdapterKind::PollDriven);

        let platform = ScriptedPlatform::events_only();
        assert_eq!(AnyAdapter::probe(&platform).kind(), AdapterKind::EventDriven);
    }

    #[test]
    fn test_status_from_error() {
        assert_eq!(
            SensorStatus::from(SensorError::Unsupported(SensorSource::Magnetometer)),
            SensorStatus::Unsupported
        );
        assert_eq!(
            SensorStatus::from(SensorError::PermissionDenied(SensorSource::Magnetometer)),
            SensorStatus::PermissionDenied
        );
        assert_eq!(
            SensorStatus::from(SensorError::ReadError {
                sensor: SensorSource::Magnetometer,
                cause: FaultCause::NotAllowed,
            }),
            SensorStatus::PermissionDenied
        );
        assert_eq!(
            SensorStatus::from(SensorError::ReadError {
                sensor: SensorSource::Magnetometer,
                cause: FaultCause::NotReadable,
            }),
            SensorStatus::Errored(FaultCause::NotReadable)
        );
    }

    #[test]
    fn test_status_usability() {
        assert!(SensorStatus::Active.is_usable());
        assert!(SensorStatus::Errored(FaultCause::Unknown).is_usable());
        assert!(!SensorStatus::Unsupported.is_usable());
        assert!(!SensorStatus::PermissionDenied.is_usable());
        assert!(!SensorStatus::Inactive.is_usable());
    }
}

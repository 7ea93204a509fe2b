//! Simulated sensor platform.
//!
//! Two device tiers:
//!
//! | Tier | Exposes |
//! |------|---------|
//! | `events` | device motion + orientation events (optionally permission gated) |
//! | `sensors` | magnetometer, linear acceleration, accelerometer and the events above |
//!
//! Signals are deterministic functions of the virtual clock. A "ghost" is a
//! timed disturbance added to the magnetic field (or heading jitter on the
//! event tier) and a vibration burst.

use clap::ValueEnum;
use ghost_common::adapter::{Capabilities, Permission, PlatformEvent, SensorPlatform, SensorSource};
use ghost_common::config::GRAVITY;
use ghost_common::error::SensorError;
use ghost_common::signal::Vector3;

/// Rate used for event sources, which have no configurable frequency.
const EVENT_RATE_HZ: u16 = 60;

/// Resting magnetic field magnitude (uT).
const AMBIENT_FIELD: f32 = 45.0;

/// Extra field during a ghost (uT).
const GHOST_FIELD: f32 = 30.0;

/// Resting compass heading (degrees).
const RESTING_HEADING: f32 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Tier {
    /// Motion and orientation events only.
    Events,
    /// Polling sensor objects available.
    Sensors,
}

#[derive(Clone, Copy, Debug)]
pub struct PlatformOptions {
    pub tier: Tier,
    /// Motion events need an explicit grant.
    pub require_permission: bool,
    /// The grant is refused.
    pub deny_permission: bool,
    /// Linear-acceleration sensor present (sensors tier).
    pub linear_acceleration: bool,
}

impl PlatformOptions {
    pub const fn new(tier: Tier) -> Self {
        Self {
            tier,
            require_permission: false,
            deny_permission: false,
            linear_acceleration: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Subscription {
    source: SensorSource,
    period_ms: u64,
    /// `None` until the first poll after subscribing.
    next_due_ms: Option<u64>,
}

/// Device model driven by the frame loop.
#[derive(Debug)]
pub struct SimulatedPlatform {
    tier: Tier,
    caps: Capabilities,
    permission: Permission,
    subscriptions: Vec<Subscription>,
    ghost_until_ms: Option<u64>,
}

/// Smooth pseudo-noise from a few incommensurate sines.
fn wobble(
    t: f32,
    amplitude: f32,
) -> f32 {
    amplitude * (0.6 * (0.7 * t).sin() + 0.3 * (5.3 * t).sin() + 0.1 * (17.9 * t).sin())
}

impl SimulatedPlatform {
    pub fn new(options: PlatformOptions) -> Self {
        let sensors = options.tier == Tier::Sensors;
        let caps = Capabilities {
            motion_events: true,
            orientation_events: true,
            motion_permission_required: options.require_permission || options.deny_permission,
            magnetometer: sensors,
            linear_acceleration: sensors && options.linear_acceleration,
            accelerometer: sensors,
        };
        let permission = if options.deny_permission {
            Permission::Denied
        } else {
            Permission::Granted
        };
        Self {
            tier: options.tier,
            caps,
            permission,
            subscriptions: Vec::new(),
            ghost_until_ms: None,
        }
    }

    pub const fn tier(&self) -> Tier { self.tier }

    /// Start a disturbance lasting `duration_ms`.
    pub fn trigger_ghost(
        &mut self,
        now_ms: u64,
        duration_ms: u64,
    ) {
        self.ghost_until_ms = Some(now_ms + duration_ms);
    }

    pub fn ghost_active(
        &self,
        now_ms: u64,
    ) -> bool {
        self.ghost_until_ms.is_some_and(|until| now_ms < until)
    }

    #[cfg(test)]
    pub fn is_subscribed(
        &self,
        source: SensorSource,
    ) -> bool {
        self.subscriptions.iter().any(|s| s.source == source)
    }

    /// Every event due up to `now_ms`, oldest first, with its timestamp.
    pub fn poll(
        &mut self,
        now_ms: u64,
    ) -> Vec<(u64, PlatformEvent)> {
        let mut due = Vec::new();
        for sub in &mut self.subscriptions {
            let mut next = sub.next_due_ms.unwrap_or(now_ms);
            while next <= now_ms {
                due.push((next, sub.source));
                next += sub.period_ms;
            }
            sub.next_due_ms = Some(next);
        }
        due.sort_by_key(|(t, _)| *t);
        due.into_iter()
            .map(|(t, source)| (t, self.sample(source, t)))
            .collect()
    }

    fn sample(
        &self,
        source: SensorSource,
        t_ms: u64,
    ) -> PlatformEvent {
        let t = t_ms as f32 / 1000.0;
        let ghost = self.ghost_active(t_ms);

        let linear = self.linear_acceleration(t, ghost);
        match source {
            SensorSource::Magnetometer => {
                let mut field = AMBIENT_FIELD + wobble(t, 2.0);
                if ghost {
                    field += GHOST_FIELD * (0.75 + 0.25 * (9.0 * t).sin());
                }
                PlatformEvent::Reading {
                    source,
                    vector: Vector3::new(field * 0.6, 0.0, field * 0.8),
                }
            }
            SensorSource::LinearAcceleration => PlatformEvent::Reading { source, vector: linear },
            SensorSource::Accelerometer => PlatformEvent::Reading {
                source,
                vector: Vector3::new(linear.x, linear.y, linear.z + GRAVITY),
            },
            SensorSource::DeviceMotion => PlatformEvent::Motion {
                acceleration: Some(linear),
                including_gravity: Some(Vector3::new(linear.x, linear.y, linear.z + GRAVITY)),
            },
            SensorSource::DeviceOrientation => {
                let mut heading = RESTING_HEADING + 2.0 * (0.5 * t).sin() + 0.03 * (37.0 * t).sin();
                if ghost {
                    heading += 4.0 * (20.0 * t).sin();
                }
                PlatformEvent::Orientation {
                    alpha: Some(heading.rem_euclid(360.0)),
                }
            }
        }
    }

    fn linear_acceleration(
        &self,
        t: f32,
        ghost: bool,
    ) -> Vector3 {
        let mut magnitude = 0.15 + wobble(t, 0.1).abs();
        if ghost {
            magnitude += 1.5 * (13.0 * t).sin().abs();
        }
        Vector3::new(magnitude * 0.6, magnitude * 0.8, 0.0)
    }

    const fn supports(
        &self,
        source: SensorSource,
    ) -> bool {
        match source {
            SensorSource::DeviceMotion => self.caps.motion_events,
            SensorSource::DeviceOrientation => self.caps.orientation_events,
            SensorSource::Magnetometer => self.caps.magnetometer,
            SensorSource::LinearAcceleration => self.caps.linear_acceleration,
            SensorSource::Accelerometer => self.caps.accelerometer,
        }
    }
}

impl SensorPlatform for SimulatedPlatform {
    fn capabilities(&self) -> Capabilities { self.caps }

    fn request_motion_permission(&mut self) -> Permission {
        tracing::info!(granted = self.permission != Permission::Denied, "motion permission requested");
        self.permission
    }

    fn subscribe(
        &mut self,
        source: SensorSource,
        rate_hz: Option<u16>,
    ) -> Result<(), SensorError> {
        if !self.supports(source) {
            return Err(SensorError::Unsupported(source));
        }
        let rate = rate_hz.unwrap_or(EVENT_RATE_HZ).max(1);
        self.subscriptions.retain(|s| s.source != source);
        self.subscriptions.push(Subscription {
            source,
            period_ms: 1000 / u64::from(rate),
            next_due_ms: None,
        });
        tracing::debug!(?source, rate, "subscribed");
        Ok(())
    }

    fn unsubscribe(
        &mut self,
        source: SensorSource,
    ) {
        self.subscriptions.retain(|s| s.source != source);
        tracing::debug!(?source, "unsubscribed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sensors() -> SimulatedPlatform { SimulatedPlatform::new(PlatformOptions::new(Tier::Sensors)) }

    fn magnitude(event: &PlatformEvent) -> f32 {
        match event {
            PlatformEvent::Reading { vector, .. } => vector.magnitude(),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_tier_capabilities() {
        let events = SimulatedPlatform::new(PlatformOptions::new(Tier::Events));
        assert!(!events.capabilities().magnetometer);
        assert!(events.capabilities().orientation_events);
        assert!(sensors().capabilities().magnetometer);

        let mut opts = PlatformOptions::new(Tier::Sensors);
        opts.linear_acceleration = false;
        assert!(!SimulatedPlatform::new(opts).capabilities().linear_acceleration);
    }

    #[test]
    fn test_denied_permission() {
        let mut opts = PlatformOptions::new(Tier::Events);
        opts.deny_permission = true;
        let mut platform = SimulatedPlatform::new(opts);
        assert!(platform.capabilities().motion_permission_required);
        assert_eq!(platform.request_motion_permission(), Permission::Denied);
    }

    #[test]
    fn test_unsupported_subscription_fails() {
        let mut platform = SimulatedPlatform::new(PlatformOptions::new(Tier::Events));
        assert_eq!(
            platform.subscribe(SensorSource::Magnetometer, Some(10)),
            Err(SensorError::Unsupported(SensorSource::Magnetometer))
        );
    }

    #[test]
    fn test_poll_respects_rate() {
        let mut platform = sensors();
        platform.subscribe(SensorSource::Magnetometer, Some(10)).unwrap();

        // First poll anchors the schedule
        assert_eq!(platform.poll(1000).len(), 1);
        assert!(platform.poll(1050).is_empty());
        let events = platform.poll(2000);
        assert_eq!(events.len(), 10);
        assert_eq!(events[0].0, 1100);
        assert!(events.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let mut platform = sensors();
        platform.subscribe(SensorSource::LinearAcceleration, Some(60)).unwrap();
        platform.poll(0);
        platform.unsubscribe(SensorSource::LinearAcceleration);
        assert!(platform.poll(1000).is_empty());
        assert!(!platform.is_subscribed(SensorSource::LinearAcceleration));
    }

    #[test]
    fn test_ghost_raises_field() {
        let mut platform = sensors();
        platform.subscribe(SensorSource::Magnetometer, Some(10)).unwrap();
        let calm = magnitude(&platform.poll(0)[0].1);
        assert!((AMBIENT_FIELD - 3.0..AMBIENT_FIELD + 3.0).contains(&calm));

        platform.trigger_ghost(50, 1000);
        assert!(platform.ghost_active(500));
        let spooky = magnitude(&platform.poll(100)[0].1);
        assert!(spooky > AMBIENT_FIELD * 1.2 * 1.1);
        assert!(!platform.ghost_active(1050));
    }

    #[test]
    fn test_accelerometer_includes_gravity() {
        let mut platform = sensors();
        platform.subscribe(SensorSource::Accelerometer, Some(60)).unwrap();
        let raw = magnitude(&platform.poll(0)[0].1);
        assert!((raw - GRAVITY).abs() < 1.0);
    }
}

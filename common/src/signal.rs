//! Scalar derivations shared by the sensor adapters.
//!
//! The two adapter strategies produce materially different magnetic signals:
//!
//! | Adapter | Magnetic value | Vibration value |
//! |---------|----------------|-----------------|
//! | Event-driven | heading instability proxy | `‖a‖` (gravity-inclusive fallback) |
//! | Poll-driven | magnetometer magnitude `‖B‖` | `‖a_lin‖` or `|‖a‖ − g|` |
//!
//! Uses `libm` so the crate stays `no_std`; `core` has no `sqrt`.

use crate::config::{GRAVITY, ORIENTATION_PROXY_GAIN, ORIENTATION_PROXY_MAX};

/// A 3-axis sample. Axes the platform could not report are passed as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(
        x: f32,
        y: f32,
        z: f32,
    ) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    #[inline]
    pub fn magnitude(&self) -> f32 { libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z) }
}

/// Accelerometer magnitude with gravity approximately removed: `|‖a‖ − g|`.
#[inline]
pub fn gravity_compensated(accel: &Vector3) -> f32 { libm::fabsf(accel.magnitude() - GRAVITY) }

/// Absolute heading change between two compass samples, wrapped across the
/// 0/360 boundary. Result is in `[0, 180]`.
pub fn heading_delta(
    previous: f32,
    current: f32,
) -> f32 {
    let mut delta = libm::fabsf(current - previous) % 360.0;
    if delta > 180.0 {
        delta = 360.0 - delta;
    }
    delta
}

/// Orientation-instability proxy for magnetic disturbance.
///
/// Devices without a magnetometer still jitter their heading near magnetic
/// sources. The delta is scaled by a fixed gain and clamped.
#[inline]
pub fn orientation_proxy(delta_deg: f32) -> f32 { (delta_deg * ORIENTATION_PROXY_GAIN).min(ORIENTATION_PROXY_MAX) }

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(samples: &[f32]) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    let sum: f32 = samples.iter().sum();
    Some(sum / samples.len() as f32)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_magnitude() {
        assert!((Vector3::new(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < 1e-5);
        assert_eq!(Vector3::default().magnitude(), 0.0);
    }

    #[test]
    fn test_gravity_compensated_at_rest() {
        let at_rest = Vector3::new(0.0, 0.0, GRAVITY);
        assert!(gravity_compensated(&at_rest) < 1e-4);

        // Free fall reads as a full g of "vibration"
        assert!((gravity_compensated(&Vector3::default()) - GRAVITY).abs() < 1e-4);
    }

    #[test]
    fn test_heading_delta_wraps() {
        assert!((heading_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((heading_delta(10.0, 350.0) - 20.0).abs() < 1e-4);
        assert!((heading_delta(90.0, 100.0) - 10.0).abs() < 1e-4);
        assert_eq!(heading_delta(0.0, 180.0), 180.0);
        assert_eq!(heading_delta(42.0, 42.0), 0.0);
    }

    #[test]
    fn test_orientation_proxy_gain_and_clamp() {
        assert!((orientation_proxy(0.1) - 5.0).abs() < 1e-4);
        assert_eq!(orientation_proxy(20.0), ORIENTATION_PROXY_MAX);
        assert_eq!(orientation_proxy(0.0), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[8.0, 9.0, 10.0, 11.0, 12.0]), Some(10.0));
    }

    proptest! {
        #[test]
        fn prop_heading_delta_in_range(a in 0.0f32..360.0, b in 0.0f32..360.0) {
            let d = heading_delta(a, b);
            prop_assert!((0.0..=180.0).contains(&d), "delta {} out of range for {} -> {}", d, a, b);
        }

        #[test]
        fn prop_heading_delta_symmetric(a in 0.0f32..360.0, b in 0.0f32..360.0) {
            prop_assert!((heading_delta(a, b) - heading_delta(b, a)).abs() < 1e-3);
        }

        #[test]
        fn prop_proxy_bounded(delta in 0.0f32..=180.0) {
            let v = orientation_proxy(delta);
            prop_assert!(v >= 0.0 && v <= ORIENTATION_PROXY_MAX);
        }
    }
}

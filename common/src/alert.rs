//! Alert evaluation.
//!
//! Stateless: the alert is recomputed for every magnetic sample and there is
//! no hysteresis, so a signal hovering at the threshold may flicker.

use crate::config::DetectorConfig;

/// True if `value` exceeds `baseline * ratio` and, when a noise floor is
/// set, also exceeds the floor.
#[inline]
pub fn evaluate(
    value: f32,
    baseline: f32,
    ratio: f32,
    noise_floor: Option<f32>,
) -> bool {
    value > baseline * ratio && noise_floor.is_none_or(|floor| value > floor)
}

/// Ratio and noise floor taken from configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlertPolicy {
    pub ratio: f32,
    pub noise_floor: Option<f32>,
}

impl AlertPolicy {
    pub const fn new(
        ratio: f32,
        noise_floor: Option<f32>,
    ) -> Self {
        Self { ratio, noise_floor }
    }

    pub const fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.alert_threshold_ratio, config.noise_floor)
    }

    /// Value above which the alert fires for `baseline`.
    #[inline]
    pub fn threshold(
        &self,
        baseline: f32,
    ) -> f32 {
        let ratio_threshold = baseline * self.ratio;
        match self.noise_floor {
            Some(floor) => ratio_threshold.max(floor),
            None => ratio_threshold,
        }
    }

    #[inline]
    pub fn evaluate(
        &self,
        value: f32,
        baseline: f32,
    ) -> bool {
        evaluate(value, baseline, self.ratio, self.noise_floor)
    }
}

impl Default for AlertPolicy {
    fn default() -> Self { Self::from_config(&DetectorConfig::default()) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert!(!evaluate(11.9, 10.0, 1.2, Some(5.0)));
        assert!(evaluate(12.1, 10.0, 1.2, Some(5.0)));
        // Strictly greater
        assert!(!evaluate(12.0, 10.0, 1.2, None));
    }

    #[test]
    fn test_noise_floor_gates_low_baselines() {
        // baseline 2.0 * 1.2 = 2.4 but floor is 5.0
        assert!(!evaluate(4.0, 2.0, 1.2, Some(5.0)));
        assert!(evaluate(4.0, 2.0, 1.2, None));
        assert!(evaluate(5.5, 2.0, 1.2, Some(5.0)));
    }

    #[test]
    fn test_policy_from_profiles() {
        let universal = AlertPolicy::default();
        assert_eq!(universal.noise_floor, Some(5.0));
        assert!(universal.evaluate(12.1, 10.0));

        let mag = AlertPolicy::from_config(&DetectorConfig::for_profile(crate::config::Profile::Magnetometer));
        assert_eq!(mag.noise_floor, None);
        assert!(!mag.evaluate(48.0, 40.0));
        assert!(mag.evaluate(48.1, 40.0));
    }

    #[test]
    fn test_policy_threshold() {
        let policy = AlertPolicy::new(1.2, Some(5.0));
        assert!((policy.threshold(10.0) - 12.0).abs() < 1e-5);
        assert_eq!(policy.threshold(2.0), 5.0);
    }

    proptest! {
        #[test]
        fn prop_alert_iff_above_threshold(
            value in 0.0f32..500.0,
            baseline in 2.0f32..200.0,
            ratio in 1.01f32..3.0,
            floor in proptest::option::of(0.1f32..50.0),
        ) {
            let expected = value > baseline * ratio && floor.map_or(true, |f| value > f);
            prop_assert_eq!(evaluate(value, baseline, ratio, floor), expected);
        }

        #[test]
        fn prop_evaluate_is_idempotent(
            value in 0.0f32..500.0,
            baseline in 2.0f32..200.0,
        ) {
            let policy = AlertPolicy::default();
            prop_assert_eq!(policy.evaluate(value, baseline), policy.evaluate(value, baseline));
        }
    }
}

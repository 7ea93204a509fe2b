//! Baseline calibration.
//!
//! The engine owns one [`CalibrationState`] per quantity and is the only code
//! that mutates it. Two modes, chosen by configuration:
//!
//! - **Timed**: [`CalibrationEngine::begin`] opens a window; the normalizer
//!   offers every admitted reading; [`CalibrationEngine::tick`] closes the
//!   window once its deadline passes and averages the buffer.
//! - **Instantaneous**: `begin` snapshots the adapter's current reading.
//!
//! Both clamp the baseline to the configured minimum, so `baseline > 0`
//! always holds and the alert ratio is never trivially satisfied.
//!
//! Calling `begin` while a timed window is open restarts the window.

use heapless::Vec;

use crate::config::{CALIBRATION_BUFFER_SIZE, CalibrationMode, DetectorConfig};
use crate::error::CalibrationError;
use crate::quantity::Quantity;
use crate::signal::mean;

/// Where the current baseline came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaselineSource {
    /// Start-up fallback; never calibrated.
    Default,
    /// Measured from readings.
    Measured,
    /// A timed window collected nothing; fallback applied.
    Defaulted,
}

/// Calibration state for one quantity.
#[derive(Clone, Debug)]
pub struct CalibrationState {
    baseline: f32,
    is_calibrating: bool,
    samples: Vec<f32, CALIBRATION_BUFFER_SIZE>,
    deadline_ms: Option<u64>,
    source: BaselineSource,
}

impl CalibrationState {
    const fn new(baseline: f32) -> Self {
        Self {
            baseline,
            is_calibrating: false,
            samples: Vec::new(),
            deadline_ms: None,
            source: BaselineSource::Default,
        }
    }

    #[inline]
    pub const fn baseline(&self) -> f32 { self.baseline }

    #[inline]
    pub const fn is_calibrating(&self) -> bool { self.is_calibrating }

    /// Samples buffered by the current (or last) timed window.
    #[inline]
    pub fn samples(&self) -> &[f32] { &self.samples }

    #[inline]
    pub const fn deadline_ms(&self) -> Option<u64> { self.deadline_ms }

    #[inline]
    pub const fn source(&self) -> BaselineSource { self.source }
}

/// Result of a calibration step, used for status text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CalibrationOutcome {
    /// A timed window opened (or restarted).
    Started { quantity: Quantity, deadline_ms: u64 },
    /// Baseline measured from readings.
    Calibrated { quantity: Quantity, baseline: f32 },
    /// Timed window was empty; default baseline applied.
    Defaulted { quantity: Quantity, baseline: f32 },
}

impl CalibrationOutcome {
    pub const fn quantity(&self) -> Quantity {
        match *self {
            Self::Started { quantity, .. } | Self::Calibrated { quantity, .. } | Self::Defaulted { quantity, .. } => {
                quantity
            }
        }
    }
}

/// Baseline from a sample set: `max(mean, floor)`.
pub fn compute_baseline(
    quantity: Quantity,
    samples: &[f32],
    floor: f32,
) -> Result<f32, CalibrationError> {
    let avg = mean(samples).ok_or(CalibrationError::Empty(quantity))?;
    Ok(avg.max(floor))
}

/// Owns the per-quantity baselines.
#[derive(Clone, Debug)]
pub struct CalibrationEngine {
    mode: CalibrationMode,
    default_baseline: f32,
    min_baseline: f32,
    states: [CalibrationState; Quantity::COUNT],
}

impl CalibrationEngine {
    pub fn new(config: &DetectorConfig) -> Self {
        // Keep the invariant even if an unvalidated config slips through
        let default_baseline = config.default_baseline.max(config.min_baseline);
        Self {
            mode: config.calibration,
            default_baseline,
            min_baseline: config.min_baseline,
            states: [
                CalibrationState::new(default_baseline),
                CalibrationState::new(default_baseline),
            ],
        }
    }

    #[inline]
    pub const fn mode(&self) -> CalibrationMode { self.mode }

    #[inline]
    pub const fn state(
        &self,
        quantity: Quantity,
    ) -> &CalibrationState {
        &self.states[quantity.index()]
    }

    #[inline]
    pub const fn baseline(
        &self,
        quantity: Quantity,
    ) -> f32 {
        self.states[quantity.index()].baseline
    }

    #[inline]
    pub const fn is_calibrating(
        &self,
        quantity: Quantity,
    ) -> bool {
        self.states[quantity.index()].is_calibrating
    }

    /// Whether any quantity has an open window.
    pub fn any_calibrating(&self) -> bool { self.states.iter().any(|s| s.is_calibrating) }

    /// Start calibrating `quantity`.
    ///
    /// `current` is the adapter's latest reading, used by the instantaneous
    /// mode. In that mode, with no reading the prior baseline is kept and
    /// [`CalibrationError::Unavailable`] is returned.
    pub fn begin(
        &mut self,
        quantity: Quantity,
        now_ms: u64,
        current: Option<f32>,
    ) -> Result<CalibrationOutcome, CalibrationError> {
        let floor = self.min_baseline;
        let state = &mut self.states[quantity.index()];

        match self.mode {
            CalibrationMode::Timed { duration_ms } => {
                let deadline_ms = now_ms.saturating_add(u64::from(duration_ms));
                state.samples.clear();
                state.is_calibrating = true;
                state.deadline_ms = Some(deadline_ms);
                Ok(CalibrationOutcome::Started { quantity, deadline_ms })
            }
            CalibrationMode::Instantaneous => {
                let value = current.ok_or(CalibrationError::Unavailable(quantity))?;
                let baseline = compute_baseline(quantity, &[value], floor)?;
                state.baseline = baseline;
                state.source = BaselineSource::Measured;
                Ok(CalibrationOutcome::Calibrated { quantity, baseline })
            }
        }
    }

    /// Offer an admitted reading. Returns true if an open window took it,
    /// meaning normal output must be suppressed. A full buffer still
    /// suppresses output but ignores the value.
    pub fn offer(
        &mut self,
        quantity: Quantity,
        value: f32,
    ) -> bool {
        let state = &mut self.states[quantity.index()];
        if !state.is_calibrating {
            return false;
        }
        if state.samples.push(value).is_err() {
            log::debug!("{quantity} calibration buffer full, sample ignored");
        }
        true
    }

    /// Close every window whose deadline has passed.
    pub fn tick(
        &mut self,
        now_ms: u64,
    ) -> Vec<CalibrationOutcome, { Quantity::COUNT }> {
        let mut finished = Vec::new();
        for quantity in Quantity::ALL {
            let state = &self.states[quantity.index()];
            let due = state.is_calibrating && state.deadline_ms.is_some_and(|deadline| now_ms >= deadline);
            if due {
                finished.push(self.finish(quantity)).ok();
            }
        }
        finished
    }

    /// Abort an open window, keeping the prior baseline. Returns true if a
    /// window was open.
    pub fn cancel(
        &mut self,
        quantity: Quantity,
    ) -> bool {
        let state = &mut self.states[quantity.index()];
        let was_open = state.is_calibrating;
        state.is_calibrating = false;
        state.deadline_ms = None;
        state.samples.clear();
        was_open
    }

    fn finish(
        &mut self,
        quantity: Quantity,
    ) -> CalibrationOutcome {
        let floor = self.min_baseline;
        let default_baseline = self.default_baseline;
        let state = &mut self.states[quantity.index()];
        state.is_calibrating = false;
        state.deadline_ms = None;

        match compute_baseline(quantity, &state.samples, floor) {
            Ok(baseline) => {
                state.baseline = baseline;
                state.source = BaselineSource::Measured;
                CalibrationOutcome::Calibrated { quantity, baseline }
            }
            Err(err) => {
                log::warn!("{err}, using default baseline {default_baseline}");
                state.baseline = default_baseline;
                state.source = BaselineSource::Defaulted;
                CalibrationOutcome::Defaulted {
                    quantity,
                    baseline: default_baseline,
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::{DEFAULT_BASELINE_MAGNETOMETER, MIN_BASELINE, Profile};

    const MAG: Quantity = Quantity::MagneticField;

    fn timed() -> CalibrationEngine { CalibrationEngine::new(&DetectorConfig::default()) }

    fn instant() -> CalibrationEngine {
        CalibrationEngine::new(&DetectorConfig::default().with_calibration(CalibrationMode::Instantaneous))
    }

    #[test]
    fn test_initial_state_uses_profile_default() {
        let engine = timed();
        assert_eq!(engine.baseline(MAG), 10.0);
        assert_eq!(engine.state(MAG).source(), BaselineSource::Default);
        assert!(!engine.is_calibrating(MAG));

        let engine = CalibrationEngine::new(&DetectorConfig::for_profile(Profile::Magnetometer));
        assert_eq!(engine.baseline(MAG), DEFAULT_BASELINE_MAGNETOMETER);
    }

    #[test]
    fn test_timed_window_lifecycle() {
        let mut engine = timed();
        let started = engine.begin(MAG, 1000, None).unwrap();
        assert_eq!(
            started,
            CalibrationOutcome::Started {
                quantity: MAG,
                deadline_ms: 3000
            }
        );
        assert!(engine.is_calibrating(MAG));

        for v in [8.0, 9.0, 10.0, 11.0, 12.0] {
            assert!(engine.offer(MAG, v));
        }

        assert!(engine.tick(2999).is_empty());
        assert!(engine.is_calibrating(MAG));

        let done = engine.tick(3000);
        assert_eq!(
            done.as_slice(),
            [CalibrationOutcome::Calibrated {
                quantity: MAG,
                baseline: 10.0
            }]
        );
        assert!(!engine.is_calibrating(MAG));
        assert_eq!(engine.baseline(MAG), 10.0);
        assert_eq!(engine.state(MAG).source(), BaselineSource::Measured);
    }

    #[test]
    fn test_timed_mean_is_clamped_to_floor() {
        let mut engine = timed();
        engine.begin(MAG, 0, None).unwrap();
        engine.offer(MAG, 0.5);
        engine.offer(MAG, 1.0);
        engine.tick(2000);
        assert_eq!(engine.baseline(MAG), MIN_BASELINE);
    }

    #[test]
    fn test_empty_window_falls_back_to_default() {
        let mut engine = timed();
        engine.begin(MAG, 0, None).unwrap();
        let done = engine.tick(5000);
        assert_eq!(
            done.as_slice(),
            [CalibrationOutcome::Defaulted {
                quantity: MAG,
                baseline: 10.0
            }]
        );
        assert_eq!(engine.state(MAG).source(), BaselineSource::Defaulted);
    }

    #[test]
    fn test_empty_window_uses_magnetometer_default() {
        let cfg = DetectorConfig::for_profile(Profile::Magnetometer)
            .with_calibration(CalibrationMode::Timed { duration_ms: 2000 });
        let mut engine = CalibrationEngine::new(&cfg);
        engine.begin(MAG, 0, None).unwrap();
        engine.tick(2000);
        assert_eq!(engine.baseline(MAG), 40.0);
    }

    #[test]
    fn test_offer_outside_window_is_refused() {
        let mut engine = timed();
        assert!(!engine.offer(MAG, 3.0));
        assert!(engine.state(MAG).samples().is_empty());
    }

    #[test]
    fn test_begin_restarts_open_window() {
        let mut engine = timed();
        engine.begin(MAG, 0, None).unwrap();
        engine.offer(MAG, 100.0);

        engine.begin(MAG, 1500, None).unwrap();
        assert!(engine.state(MAG).samples().is_empty());
        assert_eq!(engine.state(MAG).deadline_ms(), Some(3500));

        // The old deadline no longer closes the window
        assert!(engine.tick(2000).is_empty());
        engine.offer(MAG, 20.0);
        engine.tick(3500);
        assert_eq!(engine.baseline(MAG), 20.0);
    }

    #[test]
    fn test_cancel_keeps_prior_baseline() {
        let mut engine = timed();
        engine.begin(MAG, 0, None).unwrap();
        engine.offer(MAG, 100.0);
        assert!(engine.cancel(MAG));
        assert!(!engine.is_calibrating(MAG));
        assert_eq!(engine.baseline(MAG), 10.0);
        assert!(engine.tick(10_000).is_empty());
        assert!(!engine.cancel(MAG));
    }

    #[test]
    fn test_buffer_overflow_still_absorbs() {
        let mut engine = timed();
        engine.begin(MAG, 0, None).unwrap();
        for _ in 0..CALIBRATION_BUFFER_SIZE {
            engine.offer(MAG, 4.0);
        }
        assert!(engine.offer(MAG, 1000.0));
        engine.tick(2000);
        assert_eq!(engine.baseline(MAG), 4.0);
    }

    #[test]
    fn test_quantities_calibrate_independently() {
        let mut engine = timed();
        engine.begin(Quantity::Vibration, 0, None).unwrap();
        assert!(engine.is_calibrating(Quantity::Vibration));
        assert!(!engine.is_calibrating(MAG));
        assert!(engine.any_calibrating());
        assert!(!engine.offer(MAG, 1.0));
    }

    #[test]
    fn test_instantaneous_snapshot() {
        let mut engine = instant();
        let out = engine.begin(MAG, 0, Some(25.0)).unwrap();
        assert_eq!(
            out,
            CalibrationOutcome::Calibrated {
                quantity: MAG,
                baseline: 25.0
            }
        );
        assert!(!engine.is_calibrating(MAG));
        assert_eq!(engine.baseline(MAG), 25.0);
    }

    #[test]
    fn test_instantaneous_applies_floor() {
        let mut engine = instant();
        engine.begin(MAG, 0, Some(0.0)).unwrap();
        assert_eq!(engine.baseline(MAG), MIN_BASELINE);
    }

    #[test]
    fn test_instantaneous_without_reading_keeps_baseline() {
        let mut engine = instant();
        engine.begin(MAG, 0, Some(30.0)).unwrap();

        let err = engine.begin(MAG, 10, None).unwrap_err();
        assert_eq!(err, CalibrationError::Unavailable(MAG));
        assert_eq!(engine.baseline(MAG), 30.0);
        assert_eq!(engine.state(MAG).source(), BaselineSource::Measured);
    }

    #[test]
    fn test_compute_baseline_scenarios() {
        assert_eq!(compute_baseline(MAG, &[8.0, 9.0, 10.0, 11.0, 12.0], 2.0), Ok(10.0));
        assert_eq!(compute_baseline(MAG, &[], 2.0), Err(CalibrationError::Empty(MAG)));
        assert_eq!(compute_baseline(MAG, &[1.0], 2.0), Ok(2.0));
    }

    proptest! {
        #[test]
        fn prop_baseline_is_floored_mean(samples in proptest::collection::vec(0.0f32..500.0, 1..64)) {
            let baseline = compute_baseline(MAG, &samples, MIN_BASELINE).unwrap();
            let avg = samples.iter().sum::<f32>() / samples.len() as f32;
            prop_assert!(baseline >= MIN_BASELINE);
            prop_assert!((baseline - avg.max(MIN_BASELINE)).abs() < 1e-3);
        }

        #[test]
        fn prop_engine_baseline_always_positive(
            samples in proptest::collection::vec(0.0f32..50.0, 0..40),
            instant_value in proptest::option::of(0.0f32..50.0),
        ) {
            let mut engine = timed();
            engine.begin(MAG, 0, None).unwrap();
            for v in &samples {
                engine.offer(MAG, *v);
            }
            engine.tick(2000);
            prop_assert!(engine.baseline(MAG) > 0.0);

            let mut engine = instant();
            let _ = engine.begin(MAG, 0, instant_value);
            prop_assert!(engine.baseline(MAG) > 0.0);
        }
    }
}

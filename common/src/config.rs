//! Detector configuration: compile-time defaults and the runtime profile.
//!
//! All defaults are compile-time constants with validation assertions, in the
//! same way the threshold constants are checked: if a default is configured
//! inconsistently (e.g. `MIN_BASELINE` above a profile's fallback baseline),
//! compilation fails.
//!
//! # Deployment Profiles
//!
//! | Profile | Default baseline | Calibration | Noise floor |
//! |---------|------------------|-------------|-------------|
//! | `Universal` | 10.0 | timed, 2000 ms | 5.0 |
//! | `Magnetometer` | 40.0 | instantaneous | none |
//!
//! `DetectorConfig` is the runtime view. Build it from a profile, adjust
//! fields, then call [`DetectorConfig::validate`] before handing it to the
//! pipeline.

use crate::error::ConfigError;

// =============================================================================
// Pipeline Timing
// =============================================================================

/// Minimum spacing between normalized outputs per quantity (ms).
/// Device events can arrive at 60 Hz; the display budget is 10 Hz.
pub const UPDATE_INTERVAL_MS: u32 = 100;

/// Length of the timed calibration window (ms).
pub const CALIBRATION_DURATION_MS: u32 = 2000;

const _: () = assert!(UPDATE_INTERVAL_MS > 0);
const _: () = assert!(CALIBRATION_DURATION_MS >= UPDATE_INTERVAL_MS);

// =============================================================================
// Chart History
// =============================================================================

/// Default number of points shown per chart.
pub const CHART_HISTORY_DEPTH: usize = 50;

/// Upper bound for the configurable history depth (chart buffer capacity).
pub const MAX_CHART_HISTORY: usize = 128;

const _: () = assert!(CHART_HISTORY_DEPTH > 0);
const _: () = assert!(CHART_HISTORY_DEPTH <= MAX_CHART_HISTORY);

// =============================================================================
// Alert Thresholds
// =============================================================================

/// Alert fires when the reading exceeds the baseline by this ratio (+20%).
pub const ALERT_THRESHOLD_RATIO: f32 = 1.20;

/// Readings at or below this value never alert, whatever the baseline.
pub const NOISE_FLOOR: f32 = 5.0;

const _: () = assert!(ALERT_THRESHOLD_RATIO > 1.0);
const _: () = assert!(NOISE_FLOOR > 0.0);

// =============================================================================
// Calibration Baselines
// =============================================================================

/// Baselines are clamped to at least this value so the ratio test stays
/// meaningful for near-zero ambient readings.
pub const MIN_BASELINE: f32 = 2.0;

/// Fallback baseline for the universal (orientation proxy) profile.
pub const DEFAULT_BASELINE_UNIVERSAL: f32 = 10.0;

/// Fallback baseline for the magnetometer profile. Earth's field alone is
/// roughly 25-65 uT.
pub const DEFAULT_BASELINE_MAGNETOMETER: f32 = 40.0;

/// Maximum samples kept in one calibration window. Extra samples are ignored.
pub const CALIBRATION_BUFFER_SIZE: usize = 128;

const _: () = assert!(MIN_BASELINE > 0.0);
const _: () = assert!(MIN_BASELINE < DEFAULT_BASELINE_UNIVERSAL);
const _: () = assert!(DEFAULT_BASELINE_UNIVERSAL < DEFAULT_BASELINE_MAGNETOMETER);
const _: () = assert!(CALIBRATION_BUFFER_SIZE as u32 >= CALIBRATION_DURATION_MS / UPDATE_INTERVAL_MS + 1);

// =============================================================================
// Signal Derivation
// =============================================================================

/// Standard gravity used for approximate gravity removal (m/s^2).
pub const GRAVITY: f32 = 9.81;

/// Gain applied to heading instability (degrees) for the EMF proxy.
pub const ORIENTATION_PROXY_GAIN: f32 = 50.0;

/// Upper clamp for the EMF proxy.
pub const ORIENTATION_PROXY_MAX: f32 = 200.0;

/// Magnetometer polling rate.
pub const MAGNETOMETER_RATE_HZ: u16 = 10;

/// Accelerometer polling rate.
pub const ACCELEROMETER_RATE_HZ: u16 = 60;

const _: () = assert!(ORIENTATION_PROXY_GAIN > 0.0);
const _: () = assert!(ORIENTATION_PROXY_MAX > DEFAULT_BASELINE_UNIVERSAL * ALERT_THRESHOLD_RATIO);

// =============================================================================
// Audio Spectrum
// =============================================================================

/// FFT window size of the microphone analyser.
pub const FFT_SIZE: usize = 64;

/// Byte-magnitude bins per spectrum frame (half the FFT size).
pub const SPECTRUM_BINS: usize = FFT_SIZE / 2;

/// Leading bins drawn as bars.
pub const SPECTRUM_BARS: usize = 16;

const _: () = assert!(SPECTRUM_BARS <= SPECTRUM_BINS);

// =============================================================================
// Runtime Configuration
// =============================================================================

/// How a calibration request establishes the baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationMode {
    /// Average every admitted reading over a fixed window.
    Timed { duration_ms: u32 },
    /// Snapshot the adapter's current reading.
    Instantaneous,
}

impl Default for CalibrationMode {
    fn default() -> Self {
        Self::Timed {
            duration_ms: CALIBRATION_DURATION_MS,
        }
    }
}

/// Deployment profile presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Broad-compatibility profile tuned for the orientation proxy.
    #[default]
    Universal,
    /// Profile tuned for direct magnetometer magnitudes.
    Magnetometer,
}

impl Profile {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Universal => "universal",
            Self::Magnetometer => "magnetometer",
        }
    }
}

/// Runtime configuration for the detector pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    pub profile: Profile,
    pub update_interval_ms: u32,
    pub chart_history_depth: usize,
    pub alert_threshold_ratio: f32,
    pub calibration: CalibrationMode,
    pub noise_floor: Option<f32>,
    pub default_baseline: f32,
    pub min_baseline: f32,
}

impl DetectorConfig {
    /// Preset for a deployment profile.
    pub const fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Universal => Self {
                profile,
                update_interval_ms: UPDATE_INTERVAL_MS,
                chart_history_depth: CHART_HISTORY_DEPTH,
                alert_threshold_ratio: ALERT_THRESHOLD_RATIO,
                calibration: CalibrationMode::Timed {
                    duration_ms: CALIBRATION_DURATION_MS,
                },
                noise_floor: Some(NOISE_FLOOR),
                default_baseline: DEFAULT_BASELINE_UNIVERSAL,
                min_baseline: MIN_BASELINE,
            },
            Profile::Magnetometer => Self {
                profile,
                update_interval_ms: UPDATE_INTERVAL_MS,
                chart_history_depth: CHART_HISTORY_DEPTH,
                alert_threshold_ratio: ALERT_THRESHOLD_RATIO,
                calibration: CalibrationMode::Instantaneous,
                noise_floor: None,
                default_baseline: DEFAULT_BASELINE_MAGNETOMETER,
                min_baseline: MIN_BASELINE,
            },
        }
    }

    /// Override the calibration mode.
    #[must_use]
    pub const fn with_calibration(
        mut self,
        calibration: CalibrationMode,
    ) -> Self {
        self.calibration = calibration;
        self
    }

    /// Override the noise floor.
    #[must_use]
    pub const fn with_noise_floor(
        mut self,
        noise_floor: Option<f32>,
    ) -> Self {
        self.noise_floor = noise_floor;
        self
    }

    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_ms == 0 {
            return Err(ConfigError::ZeroUpdateInterval);
        }
        if self.chart_history_depth == 0 || self.chart_history_depth > MAX_CHART_HISTORY {
            return Err(ConfigError::HistoryDepth {
                depth: self.chart_history_depth,
                max: MAX_CHART_HISTORY,
            });
        }
        if !(self.alert_threshold_ratio > 0.0) {
            return Err(ConfigError::ThresholdRatio(self.alert_threshold_ratio));
        }
        if let CalibrationMode::Timed { duration_ms } = self.calibration {
            if duration_ms == 0 {
                return Err(ConfigError::ZeroCalibrationWindow);
            }
            // Every admitted sample of a window must fit the buffer
            if (duration_ms / self.update_interval_ms) as usize + 1 > CALIBRATION_BUFFER_SIZE {
                return Err(ConfigError::CalibrationWindowTooLong {
                    duration_ms,
                    interval_ms: self.update_interval_ms,
                    capacity: CALIBRATION_BUFFER_SIZE,
                });
            }
        }
        if let Some(floor) = self.noise_floor
            && !(floor > 0.0)
        {
            return Err(ConfigError::NoiseFloor(floor));
        }
        if !(self.min_baseline > 0.0) {
            return Err(ConfigError::MinBaseline(self.min_baseline));
        }
        if !(self.default_baseline >= self.min_baseline) {
            return Err(ConfigError::DefaultBaseline {
                baseline: self.default_baseline,
                floor: self.min_baseline,
            });
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self { Self::for_profile(Profile::Universal) }
}

// =============================================================================
// Unit Tests
// =============================================================================

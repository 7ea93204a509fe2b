//! Error types for the detector pipeline.
//!
//! Every error here is recoverable. The pipeline root turns them into status
//! text and log entries; none of them stop the other quantity.

use thiserror::Error;

use crate::adapter::SensorSource;
use crate::quantity::Quantity;

/// Why a sensor stopped producing readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultCause {
    /// The platform revoked access after the sensor started.
    NotAllowed,
    /// The sensor could not be read (hardware or driver fault).
    NotReadable,
    /// The platform reported an error without a usable cause.
    Unknown,
}

impl FaultCause {
    /// Short tag for status lines.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::NotAllowed => "not allowed",
            Self::NotReadable => "not readable",
            Self::Unknown => "unknown",
        }
    }
}

impl core::fmt::Display for FaultCause {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Sensor acquisition failures.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorError {
    #[error("{0:?} is not supported on this device")]
    Unsupported(SensorSource),

    #[error("permission denied for {0:?}")]
    PermissionDenied(SensorSource),

    #[error("{sensor:?} read error: {cause}")]
    ReadError { sensor: SensorSource, cause: FaultCause },
}

/// Calibration failures. Both are recovered locally.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    /// The timed window closed without a single admitted sample. The
    /// configured default baseline is applied instead.
    #[error("no {0} samples collected during the calibration window")]
    Empty(Quantity),

    /// Instantaneous calibration was requested with no current reading. The
    /// prior baseline is kept.
    #[error("no {0} reading available for calibration")]
    Unavailable(Quantity),
}

/// Invalid runtime configuration.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    #[error("update interval must be greater than zero")]
    ZeroUpdateInterval,

    #[error("chart history depth {depth} outside 1..={max}")]
    HistoryDepth { depth: usize, max: usize },

    #[error("alert threshold ratio must be positive, got {0}")]
    ThresholdRatio(f32),

    #[error("timed calibration window must be greater than zero")]
    ZeroCalibrationWindow,

    #[error("calibration window of {duration_ms} ms at {interval_ms} ms per sample exceeds {capacity} samples")]
    CalibrationWindowTooLong {
        duration_ms: u32,
        interval_ms: u32,
        capacity: usize,
    },

    #[error("noise floor must be positive, got {0}")]
    NoiseFloor(f32),

    #[error("minimum baseline must be positive, got {0}")]
    MinBaseline(f32),

    #[error("default baseline {baseline} is below the minimum {floor}")]
    DefaultBaseline { baseline: f32, floor: f32 },
}

//! Throttled per-quantity normalization of raw readings.
//!
//! Device events arrive far faster than the display needs (60 Hz vs a 100 ms
//! budget). Each quantity keeps its own throttle; a reading arriving inside
//! the interval is dropped outright. There is no queue and no last-value
//! substitution.
//!
//! Admitted readings either feed an open calibration window or go out for
//! display and alert evaluation.

use crate::calibration::CalibrationEngine;
use crate::quantity::{Quantity, SensorReading};

/// Rate limiter for one quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    last_update_ms: Option<u64>,
    interval_ms: u32,
}

impl Throttle {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            last_update_ms: None,
            interval_ms,
        }
    }

    /// Returns true and records `now_ms` if enough time has passed since the
    /// last admitted reading. The first reading is always admitted.
    pub fn admit(
        &mut self,
        now_ms: u64,
    ) -> bool {
        if let Some(last) = self.last_update_ms
            && now_ms.saturating_sub(last) < u64::from(self.interval_ms)
        {
            return false;
        }
        self.last_update_ms = Some(now_ms);
        true
    }

    /// Forget the last admission so the next reading passes.
    pub fn reset(&mut self) { self.last_update_ms = None; }

    #[inline]
    pub const fn last_update_ms(&self) -> Option<u64> { self.last_update_ms }
}

/// What happened to one raw reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Normalized {
    /// Inside the throttle interval; discarded.
    Dropped,
    /// Buffered by an open calibration window; no display output.
    Absorbed,
    /// Ready for the presentation sink (and the alert evaluator).
    Emit(SensorReading),
}

/// Counters for the diagnostics page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizerStats {
    pub emitted: u32,
    pub dropped: u32,
    pub absorbed: u32,
}

/// Per-quantity throttling in front of the calibration engine.
#[derive(Clone, Debug)]
pub struct SignalNormalizer {
    throttles: [Throttle; Quantity::COUNT],
    stats: NormalizerStats,
}

impl SignalNormalizer {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            throttles: [Throttle::new(interval_ms); Quantity::COUNT],
            stats: NormalizerStats {
                emitted: 0,
                dropped: 0,
                absorbed: 0,
            },
        }
    }

    /// Throttle a raw reading, then route it to calibration or output.
    pub fn on_raw_reading(
        &mut self,
        reading: SensorReading,
        calibration: &mut CalibrationEngine,
    ) -> Normalized {
        if !self.throttles[reading.quantity.index()].admit(reading.timestamp_ms) {
            self.stats.dropped = self.stats.dropped.saturating_add(1);
            return Normalized::Dropped;
        }

        if calibration.offer(reading.quantity, reading.value) {
            self.stats.absorbed = self.stats.absorbed.saturating_add(1);
            return Normalized::Absorbed;
        }

        self.stats.emitted = self.stats.emitted.saturating_add(1);
        Normalized::Emit(reading)
    }

    /// Reset every throttle (after stop/start).
    pub fn reset(&mut self) {
        for throttle in &mut self.throttles {
            throttle.reset();
        }
    }

    #[inline]
    pub const fn stats(&self) -> NormalizerStats { self.stats }
}

// =============================================================================
// Unit Tests
// =============================================================================

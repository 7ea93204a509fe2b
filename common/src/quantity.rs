//! Physical quantities tracked by the detector and the readings that carry them.

use core::fmt;

/// A physical quantity the detector can sense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Magnetic disturbance ("EMF"). Either a direct magnetometer magnitude
    /// or an orientation-instability proxy, depending on the adapter.
    MagneticField,
    /// Vibration magnitude derived from acceleration.
    Vibration,
}

impl Quantity {
    /// Number of quantities. Sizes the per-quantity state arrays.
    pub const COUNT: usize = 2;

    /// All quantities in index order.
    pub const ALL: [Self; Self::COUNT] = [Self::MagneticField, Self::Vibration];

    /// Stable array index for per-quantity state.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::MagneticField => 0,
            Self::Vibration => 1,
        }
    }

    /// Short cell label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MagneticField => "EMF",
            Self::Vibration => "VIB",
        }
    }

    /// Display unit. The EMF value is a heuristic, so its unit is nominal.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::MagneticField => "uT",
            Self::Vibration => "m/s2",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::MagneticField => f.write_str("magnetic field"),
            Self::Vibration => f.write_str("vibration"),
        }
    }
}

/// One scalar sample produced by a sensor adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    pub quantity: Quantity,
    /// Non-negative scalar value.
    pub value: f32,
    /// Milliseconds on the session clock.
    pub timestamp_ms: u64,
}

impl SensorReading {
    /// Create a reading. Negative or NaN inputs are stored as 0.
    pub fn new(
        quantity: Quantity,
        value: f32,
        timestamp_ms: u64,
    ) -> Self {
        let value = if value > 0.0 { value } else { 0.0 };
        Self {
            quantity,
            value,
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_unique_and_dense() {
        for (i, q) in Quantity::ALL.iter().enumerate() {
            assert_eq!(q.index(), i);
        }
    }

    #[test]
    fn test_reading_clamps_negative_and_nan() {
        assert_eq!(SensorReading::new(Quantity::Vibration, -1.0, 0).value, 0.0);
        assert_eq!(SensorReading::new(Quantity::Vibration, f32::NAN, 0).value, 0.0);
        assert_eq!(SensorReading::new(Quantity::Vibration, 3.5, 7).value, 3.5);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Quantity::MagneticField.label(), "EMF");
        assert_eq!(Quantity::Vibration.label(), "VIB");
    }
}

//! Color constants for the detector screen.
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! Standard colors come from the `RgbColor` trait; the rest are tuned for a
//! dark "instrument" look.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Background and dark text.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Text on dark backgrounds.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Alert overlay and error lines.
pub const RED: Rgb565 = Rgb565::RED;

/// Nominal status and info lines.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Calibration in progress and warnings.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Vibration chart trace.
pub const CYAN: Rgb565 = Rgb565::CYAN;

// =============================================================================
// Custom Colors
// =============================================================================

/// Spectrum bars. RGB565: (31, 32, 0).
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Divider lines and trace-level log text. RGB565: (8, 16, 8).
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Labels and debug-level log text. RGB565: (20, 40, 20).
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(20, 40, 20);

/// EMF chart trace, a phosphor green. RGB565: (6, 58, 12).
pub const PHOSPHOR: Rgb565 = Rgb565::new(6, 58, 12);

/// Dimmed red behind the alert banner. RGB565: (12, 0, 0).
pub const DARK_RED: Rgb565 = Rgb565::new(12, 0, 0);

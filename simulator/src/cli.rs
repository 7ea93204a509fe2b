//! Command line.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ghost_common::config::{CalibrationMode, DetectorConfig, Profile};

use crate::platform::Tier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Universal,
    Magnetometer,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Universal => Self::Universal,
            ProfileArg::Magnetometer => Self::Magnetometer,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CalibrationArg {
    Timed,
    Instant,
}

/// Ghost detector simulator.
#[derive(Debug, Parser)]
#[command(name = "simulator", version, about)]
pub struct Cli {
    /// Simulated device tier.
    #[arg(long, value_enum, default_value_t = Tier::Sensors)]
    pub platform: Tier,

    /// Deployment profile. Defaults to the one matching the platform tier.
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Calibration mode. Defaults to the profile's mode.
    #[arg(long, value_enum)]
    pub calibration: Option<CalibrationArg>,

    /// Timed calibration window in milliseconds.
    #[arg(long, default_value_t = ghost_common::config::CALIBRATION_DURATION_MS)]
    pub calibration_ms: u32,

    /// Disable the alert noise floor.
    #[arg(long)]
    pub no_noise_floor: bool,

    /// Deny the motion permission prompt (event tier).
    #[arg(long)]
    pub deny_permission: bool,

    /// Hide the linear-acceleration sensor so the accelerometer fallback is used.
    #[arg(long)]
    pub no_linear: bool,

    /// Make the microphone fail to open.
    #[arg(long)]
    pub no_mic: bool,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 200)]
    pub frames: u32,

    /// PNG written at the end of a headless run.
    #[arg(long, default_value = "ghost-detector.png")]
    pub snapshot: PathBuf,

    /// Output pixel scale.
    #[arg(long, default_value_t = 2)]
    pub scale: u32,

    /// Open an interactive window (needs the `window` feature).
    #[arg(long)]
    pub window: bool,
}

impl Cli {
    pub fn profile(&self) -> Profile {
        self.profile.map_or(
            match self.platform {
                Tier::Events => Profile::Universal,
                Tier::Sensors => Profile::Magnetometer,
            },
            Profile::from,
        )
    }

    /// Build and validate the detector configuration.
    pub fn config(&self) -> anyhow::Result<DetectorConfig> {
        let mut config = DetectorConfig::for_profile(self.profile());
        match self.calibration {
            Some(CalibrationArg::Timed) => {
                config = config.with_calibration(CalibrationMode::Timed {
                    duration_ms: self.calibration_ms,
                });
            }
            Some(CalibrationArg::Instant) => config = config.with_calibration(CalibrationMode::Instantaneous),
            None => {
                if let CalibrationMode::Timed { .. } = config.calibration {
                    config = config.with_calibration(CalibrationMode::Timed {
                        duration_ms: self.calibration_ms,
                    });
                }
            }
        }
        if self.no_noise_floor {
            config = config.with_noise_floor(None);
        }
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

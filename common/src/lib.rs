//! Sensor-to-alert pipeline for the ghost detector.
//!
//! This crate holds everything that does not depend on a host:
//!
//! - [`adapter`]: capability-selected sensor acquisition (event or polling)
//! - [`normalizer`]: per-quantity throttling
//! - [`calibration`]: timed and instantaneous baseline calibration
//! - [`alert`]: ratio threshold evaluation
//! - [`pipeline`]: the [`Detector`] context object wiring them together
//! - [`sink`]: presentation boundary and status text
//! - [`chart`], [`event_log`]: display-side buffers
//! - [`widgets`], [`colors`], [`styles`], [`layout`]: `embedded-graphics` screen
//!
//! # no_std Compatibility
//!
//! The crate is `no_std`; every entry point takes the host clock as
//! `now_ms: u64` and buffers are `heapless`. Tests run on the host with std.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod adapter;
pub mod alert;
pub mod calibration;
pub mod chart;
pub mod colors;
pub mod config;
pub mod error;
pub mod event_log;
pub mod layout;
pub mod normalizer;
pub mod pipeline;
pub mod quantity;
pub mod signal;
pub mod sink;
pub mod styles;
pub mod widgets;

pub use adapter::{AnyAdapter, PlatformEvent, SensorAdapter, SensorPlatform, SensorStatus};
pub use config::{CalibrationMode, DetectorConfig, Profile};
pub use pipeline::Detector;
pub use quantity::{Quantity, SensorReading};
pub use sink::PresentationSink;

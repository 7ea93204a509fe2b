//! Pipeline root.
//!
//! [`Detector`] owns the adapter, normalizer, calibration engine, alert
//! policy and event log for one session. The host drives it:
//!
//! ```text
//! platform event ──► handle_event ──► adapter ──► normalizer ─┬─► sink (value, chart)
//!                                                 │           └─► alert ─► sink
//!                                                 └─► calibration buffer
//! frame loop ──────► tick ──► calibration deadlines ──► sink (status)
//! ```
//!
//! Every entry point takes `now_ms` from the host clock; nothing here reads
//! time on its own.

use crate::adapter::{
    AdapterOutput,
    AdapterOutputs,
    AnyAdapter,
    PlatformEvent,
    SensorAdapter,
    SensorPlatform,
    SensorStatus,
};
use crate::alert::AlertPolicy;
use crate::calibration::{CalibrationEngine, CalibrationOutcome};
use crate::config::{CalibrationMode, DetectorConfig};
use crate::error::{CalibrationError, ConfigError};
use crate::event_log::{EventLog, LogLevel};
use crate::normalizer::{Normalized, NormalizerStats, SignalNormalizer};
use crate::quantity::{Quantity, SensorReading};
use crate::sink::{
    PresentationSink,
    STATUS_CALIBRATED_DEFAULTS,
    STATUS_CALIBRATING,
    STATUS_CALIBRATION_FAILED,
    STATUS_NO_SENSORS,
    STATUS_PERMISSION_DENIED,
    STATUS_READY,
    STATUS_STOPPED,
    calibrated,
    sensor_status_line,
    sensors_active,
};

/// One detector session.
#[derive(Debug)]
pub struct Detector<A: SensorAdapter = AnyAdapter> {
    config: DetectorConfig,
    adapter: A,
    normalizer: SignalNormalizer,
    calibration: CalibrationEngine,
    policy: AlertPolicy,
    log: EventLog,
    alert_active: bool,
    running: bool,
}

impl Detector<AnyAdapter> {
    /// Probe the platform once and build the matching adapter.
    pub fn probe(
        config: DetectorConfig,
        platform: &dyn SensorPlatform,
    ) -> Result<Self, ConfigError> {
        Self::new(config, AnyAdapter::probe(platform))
    }
}

impl<A: SensorAdapter> Detector<A> {
    /// Validate `config` and assemble the pipeline.
    pub fn new(
        config: DetectorConfig,
        adapter: A,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            normalizer: SignalNormalizer::new(config.update_interval_ms),
            calibration: CalibrationEngine::new(&config),
            policy: AlertPolicy::from_config(&config),
            log: EventLog::new(),
            alert_active: false,
            running: false,
            adapter,
            config,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Show the idle prompt before the user arms the detector.
    pub fn announce_ready(
        &mut self,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) {
        self.status(sink, LogLevel::Info, now_ms, STATUS_READY);
    }

    /// Start the sensors. Returns true if at least one quantity is usable.
    pub fn start(
        &mut self,
        platform: &mut dyn SensorPlatform,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) -> bool {
        if self.running {
            log::debug!("start ignored, already running");
            return self.any_usable();
        }

        let outputs = self.adapter.start(platform);
        self.normalizer.reset();
        self.dispatch(outputs, sink, now_ms);

        let denied = Quantity::ALL
            .iter()
            .all(|&q| self.adapter.status(q) == SensorStatus::PermissionDenied);

        if !self.any_usable() {
            // Stay idle so the next start asks the platform again. The sink
            // keeps the degraded sensor marks.
            self.adapter.stop(platform);
            let text = if denied { STATUS_PERMISSION_DENIED } else { STATUS_NO_SENSORS };
            self.status(sink, LogLevel::Error, now_ms, text);
            false
        } else {
            self.running = true;
            let text = sensors_active(self.adapter.kind().mode_name());
            self.status(sink, LogLevel::Info, now_ms, &text);
            true
        }
    }

    /// Start the sensors and calibrate the magnetic baseline.
    ///
    /// Instantaneous calibration needs a reading, so right after start it is
    /// only attempted if the adapter already has one.
    pub fn arm(
        &mut self,
        platform: &mut dyn SensorPlatform,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) -> bool {
        if !self.start(platform, sink, now_ms) {
            return false;
        }
        let can_calibrate = match self.config.calibration {
            CalibrationMode::Timed { .. } => true,
            CalibrationMode::Instantaneous => self.adapter.current(Quantity::MagneticField).is_some(),
        };
        if can_calibrate {
            self.begin_calibration(Quantity::MagneticField, sink, now_ms).ok();
        }
        true
    }

    /// Release every sensor and close open calibration windows.
    pub fn stop(
        &mut self,
        platform: &mut dyn SensorPlatform,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) {
        let outputs = self.adapter.stop(platform);
        self.dispatch(outputs, sink, now_ms);

        for quantity in Quantity::ALL {
            if self.calibration.cancel(quantity) {
                self.log
                    .push_fmt(LogLevel::Warn, now_ms, format_args!("{quantity} calibration cancelled"));
            }
        }
        self.normalizer.reset();
        self.running = false;
        if self.alert_active {
            self.alert_active = false;
            sink.set_alert_active(false);
        }
        self.status(sink, LogLevel::Info, now_ms, STATUS_STOPPED);
    }

    // =========================================================================
    // Calibration
    // =========================================================================

    /// Calibrate `quantity` with the configured mode.
    ///
    /// Starting a magnetic calibration clears the alert; it is not evaluated
    /// again until the window closes.
    pub fn begin_calibration(
        &mut self,
        quantity: Quantity,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) -> Result<CalibrationOutcome, CalibrationError> {
        let current = self.adapter.current(quantity);
        match self.calibration.begin(quantity, now_ms, current) {
            Ok(outcome) => {
                if quantity == Quantity::MagneticField
                    && matches!(outcome, CalibrationOutcome::Started { .. })
                    && self.alert_active
                {
                    self.alert_active = false;
                    sink.set_alert_active(false);
                }
                self.report(outcome, sink, now_ms);
                Ok(outcome)
            }
            Err(err) => {
                self.log.push_fmt(LogLevel::Warn, now_ms, format_args!("{err}"));
                sink.set_status_text(STATUS_CALIBRATION_FAILED);
                Err(err)
            }
        }
    }

    /// Advance time-based state. Call once per host frame.
    pub fn tick(
        &mut self,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) {
        for outcome in self.calibration.tick(now_ms) {
            self.report(outcome, sink, now_ms);
        }
    }

    fn report(
        &mut self,
        outcome: CalibrationOutcome,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) {
        match outcome {
            CalibrationOutcome::Started { quantity, .. } => {
                self.log
                    .push_fmt(LogLevel::Info, now_ms, format_args!("{quantity} calibration started"));
                sink.set_status_text(STATUS_CALIBRATING);
            }
            CalibrationOutcome::Calibrated { quantity, baseline } => {
                self.log.push_fmt(
                    LogLevel::Info,
                    now_ms,
                    format_args!("{} baseline {baseline:.2}", quantity.label()),
                );
                sink.set_status_text(&calibrated(baseline));
            }
            CalibrationOutcome::Defaulted { quantity, baseline } => {
                self.log.push_fmt(
                    LogLevel::Warn,
                    now_ms,
                    format_args!("{} no samples, default {baseline:.1}", quantity.label()),
                );
                sink.set_status_text(STATUS_CALIBRATED_DEFAULTS);
            }
        }
    }

    // =========================================================================
    // Event Path
    // =========================================================================

    /// Feed one platform event through the pipeline.
    pub fn handle_event(
        &mut self,
        event: &PlatformEvent,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) {
        if !self.running {
            return;
        }
        let outputs = self.adapter.handle(event, now_ms);
        self.dispatch(outputs, sink, now_ms);
    }

    fn dispatch(
        &mut self,
        outputs: AdapterOutputs,
        sink: &mut dyn PresentationSink,
        now_ms: u64,
    ) {
        for output in outputs {
            match output {
                AdapterOutput::Reading(reading) => {
                    if let Normalized::Emit(reading) = self.normalizer.on_raw_reading(reading, &mut self.calibration) {
                        self.present(reading, sink);
                    }
                }
                AdapterOutput::Status(quantity, status) => {
                    let level = match status {
                        SensorStatus::Active | SensorStatus::Inactive => LogLevel::Info,
                        SensorStatus::Unsupported => LogLevel::Warn,
                        SensorStatus::PermissionDenied | SensorStatus::Errored(_) => LogLevel::Error,
                    };
                    self.log.push(level, now_ms, &sensor_status_line(quantity, status));
                    sink.set_sensor_status(quantity, status);
                }
            }
        }
    }

    fn present(
        &mut self,
        reading: SensorReading,
        sink: &mut dyn PresentationSink,
    ) {
        let quantity = reading.quantity;
        let value = reading.value.max(0.0);
        sink.display_scalar(quantity, value);
        sink.push_chart_point(quantity, value);

        if quantity == Quantity::MagneticField && !self.calibration.is_calibrating(quantity) {
            let active = self.policy.evaluate(value, self.calibration.baseline(quantity));
            if active != self.alert_active {
                let level = if active { LogLevel::Warn } else { LogLevel::Info };
                self.log.push_fmt(
                    level,
                    reading.timestamp_ms,
                    format_args!("alert {} at {value:.2}", if active { "on" } else { "off" }),
                );
            }
            self.alert_active = active;
            sink.set_alert_active(active);
        }
    }

    fn status(
        &mut self,
        sink: &mut dyn PresentationSink,
        level: LogLevel,
        now_ms: u64,
        text: &str,
    ) {
        self.log.push(level, now_ms, text);
        sink.set_status_text(text);
    }

    fn any_usable(&self) -> bool { Quantity::ALL.iter().any(|&q| self.adapter.status(q).is_usable()) }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub const fn config(&self) -> &DetectorConfig { &self.config }

    #[inline]
    pub const fn adapter(&self) -> &A { &self.adapter }

    #[inline]
    pub const fn calibration(&self) -> &CalibrationEngine { &self.calibration }

    #[inline]
    pub const fn policy(&self) -> &AlertPolicy { &self.policy }

    #[inline]
    pub const fn normalizer_stats(&self) -> NormalizerStats { self.normalizer.stats() }

    #[inline]
    pub const fn log(&self) -> &EventLog { &self.log }

    /// Host-side entries (microphone, key presses) share the same log.
    #[inline]
    pub const fn log_mut(&mut self) -> &mut EventLog { &mut self.log }

    #[inline]
    pub const fn alert_active(&self) -> bool { self.alert_active }

    #[inline]
    pub const fn is_running(&self) -> bool { self.running }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Simulator session: the detector, its simulated device and the screen state.
//!
//! Both the interactive window and the headless runner drive the same
//! [`App`]: commands come from keys or a script, and [`App::step`] advances
//! everything to the current clock once per frame.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use ghost_common::event_log::LogLevel;
use ghost_common::sink::{PresentationSink, STATUS_MIC_ERROR};
use ghost_common::{CalibrationMode, Detector, DetectorConfig, Quantity, SensorAdapter};

use crate::audio::SpectrumTask;
use crate::platform::{PlatformOptions, SimulatedPlatform};
use crate::popup::Popup;
use crate::render::draw_detector_page;
use crate::screens::draw_log_page;
use crate::sink::ScreenSink;
use crate::timing::GHOST_DURATION_MS;

/// Visible page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Detector,
    Log,
}

impl Page {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Detector => Self::Log,
            Self::Log => Self::Detector,
        }
    }
}

/// User actions, bound to keys in the window and scripted when headless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Arm the sensors on first press, recalibrate afterwards.
    Calibrate,
    ToggleMic,
    Ghost,
    /// Window only; the headless script stays on the detector page.
    #[cfg_attr(not(feature = "window"), allow(dead_code))]
    TogglePage,
    #[cfg_attr(not(feature = "window"), allow(dead_code))]
    Stop,
}

#[derive(Debug)]
pub struct App {
    detector: Detector,
    platform: SimulatedPlatform,
    sink: ScreenSink,
    spectrum: SpectrumTask,
    page: Page,
    popup: Option<Popup>,
}

impl App {
    pub fn new(
        config: DetectorConfig,
        options: PlatformOptions,
        mic_available: bool,
        now_ms: u64,
    ) -> anyhow::Result<Self> {
        let platform = SimulatedPlatform::new(options);
        let mut detector = Detector::probe(config, &platform)?;
        let mut sink = ScreenSink::new(config.chart_history_depth);
        detector.announce_ready(&mut sink, now_ms);
        tracing::info!(
            profile = config.profile.name(),
            tier = ?platform.tier(),
            adapter = detector.adapter().kind().mode_name(),
            "session created"
        );
        Ok(Self {
            detector,
            platform,
            sink,
            spectrum: SpectrumTask::new(mic_available),
            page: Page::default(),
            popup: None,
        })
    }

    pub fn command(
        &mut self,
        command: Command,
        now_ms: u64,
    ) {
        tracing::debug!(?command, now_ms, "command");
        match command {
            Command::Calibrate => self.calibrate(now_ms),
            Command::ToggleMic => self.toggle_mic(now_ms),
            Command::Ghost => {
                self.platform.trigger_ghost(now_ms, GHOST_DURATION_MS);
                self.detector.log_mut().warn(now_ms, "disturbance injected");
                self.popup = Some(Popup::Ghost(now_ms));
            }
            Command::TogglePage => {
                self.page = self.page.toggle();
                self.popup = None;
            }
            Command::Stop => self.shutdown(now_ms),
        }
    }

    fn calibrate(
        &mut self,
        now_ms: u64,
    ) {
        self.popup = Some(Popup::Calibrate(now_ms));
        if self.detector.is_running() {
            self.detector
                .begin_calibration(Quantity::MagneticField, &mut self.sink, now_ms)
                .ok();
        } else {
            self.detector.arm(&mut self.platform, &mut self.sink, now_ms);
        }
    }

    fn toggle_mic(
        &mut self,
        now_ms: u64,
    ) {
        if self.spectrum.is_running() {
            self.spectrum.cancel();
            self.detector.log_mut().info(now_ms, "microphone off");
            self.popup = Some(Popup::MicOff(now_ms));
            return;
        }
        match self.spectrum.start(now_ms) {
            Ok(_) => {
                self.detector.log_mut().info(now_ms, "microphone on");
                self.popup = Some(Popup::MicOn(now_ms));
            }
            Err(err) => {
                tracing::warn!(%err, "microphone failed");
                self.detector
                    .log_mut()
                    .push_fmt(LogLevel::Error, now_ms, format_args!("{err}"));
                self.sink.set_status_text(STATUS_MIC_ERROR);
                self.popup = Some(Popup::MicError(now_ms));
            }
        }
    }

    /// Advance the session to `now_ms`.
    pub fn step(
        &mut self,
        now_ms: u64,
    ) {
        for (timestamp, event) in self.platform.poll(now_ms) {
            self.detector.handle_event(&event, &mut self.sink, timestamp);
        }
        self.detector.tick(&mut self.sink, now_ms);
        self.spectrum.poll(now_ms);

        if self.popup.is_some_and(|p| p.is_expired(now_ms)) {
            self.popup = None;
        }
    }

    /// Release sensors and the microphone.
    pub fn shutdown(
        &mut self,
        now_ms: u64,
    ) {
        self.spectrum.cancel();
        if self.detector.is_running() {
            self.detector.stop(&mut self.platform, &mut self.sink, now_ms);
        }
    }

    pub fn draw<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        match self.page {
            Page::Detector => draw_detector_page(
                display,
                &self.detector,
                &self.sink,
                self.spectrum.latest().map(|bins| bins.as_slice()),
                self.popup,
            ),
            Page::Log => draw_log_page(display, &self.detector),
        }
    }

    pub const fn detector(&self) -> &Detector { &self.detector }

    pub const fn platform(&self) -> &SimulatedPlatform { &self.platform }

    pub const fn sink(&self) -> &ScreenSink { &self.sink }

    pub const fn page(&self) -> Page { self.page }

    pub const fn popup(&self) -> Option<Popup> { self.popup }

    pub const fn mic_running(&self) -> bool { self.spectrum.is_running() }
}

/// Scripted commands for a headless run, as `(at_ms, command)`.
///
/// Instantaneous calibration needs a reading first, so that mode gets an
/// extra calibrate once the sensors have settled.
pub fn headless_script(config: &DetectorConfig) -> Vec<(u64, Command)> {
    let mut script = vec![(0, Command::Calibrate), (400, Command::ToggleMic)];
    if config.calibration == CalibrationMode::Instantaneous {
        script.push((1000, Command::Calibrate));
    }
    script.push((3000, Command::Ghost));
    script
}

/// Current `(magnetic, vibration)` baselines.
pub fn baselines(detector: &Detector) -> (f32, f32) {
    let calibration = detector.calibration();
    (
        calibration.baseline(Quantity::MagneticField),
        calibration.baseline(Quantity::Vibration),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use ghost_common::adapter::SensorSource;
    use ghost_common::event_log::LogLevel;
    use ghost_common::sink::{STATUS_CALIBRATING, STATUS_PERMISSION_DENIED, STATUS_READY, STATUS_STOPPED};
    use ghost_common::{Profile, SensorStatus};

    use super::*;
    use crate::platform::Tier;
    use crate::timing::{FRAME_MS, POPUP_DURATION_MS};

    fn app(
        tier: Tier,
        profile: Profile,
        mic: bool,
    ) -> App {
        App::new(DetectorConfig::for_profile(profile), PlatformOptions::new(tier), mic, 0).unwrap()
    }

    /// Step frame by frame over `[from, to)`, returning whether the alert was seen.
    fn run(
        app: &mut App,
        from: u64,
        to: u64,
    ) -> bool {
        let mut seen = false;
        let mut now = from;
        while now < to {
            app.step(now);
            seen |= app.sink().alert();
            now += FRAME_MS;
        }
        seen
    }

    #[test]
    fn test_starts_idle() {
        let app = app(Tier::Sensors, Profile::Magnetometer, true);
        assert!(!app.detector().is_running());
        assert_eq!(app.sink().status_text(), STATUS_READY);
        assert_eq!(app.page(), Page::Detector);
    }

    #[test]
    fn test_first_calibrate_arms_sensors() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, true);
        app.command(Command::Calibrate, 0);
        assert!(app.detector().is_running());
        assert_eq!(app.sink().sensor_status(Quantity::MagneticField), SensorStatus::Active);
        assert_eq!(app.popup(), Some(Popup::Calibrate(0)));

        run(&mut app, 0, 1000);
        app.command(Command::Calibrate, 1000);
        let baseline = app.detector().calibration().baseline(Quantity::MagneticField);
        assert!((40.0..50.0).contains(&baseline), "baseline {baseline}");
        assert!(app.sink().status_text().starts_with("calibrated (base: "));
    }

    #[test]
    fn test_ghost_raises_alert_on_magnetometer() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, true);
        app.command(Command::Calibrate, 0);
        assert!(!run(&mut app, 0, 1000));
        app.command(Command::Calibrate, 1000);
        assert!(!run(&mut app, 1000, 3000));

        app.command(Command::Ghost, 3000);
        assert!(run(&mut app, 3000, 4000));
        assert!(app.sink().alert());
    }

    #[test]
    fn test_timed_calibration_on_event_tier() {
        let mut app = app(Tier::Events, Profile::Universal, true);
        app.command(Command::Calibrate, 0);
        assert_eq!(app.sink().status_text(), STATUS_CALIBRATING);
        assert!(!run(&mut app, 0, 2100));
        assert!(!app.detector().calibration().is_calibrating(Quantity::MagneticField));
        assert!(app.sink().status_text().starts_with("calibrated"));

        app.command(Command::Ghost, 2500);
        assert!(run(&mut app, 2500, 3500));
    }

    #[test]
    fn test_ghost_during_calibration_never_alerts() {
        let mut app = app(Tier::Events, Profile::Universal, true);
        app.command(Command::Calibrate, 0);
        app.command(Command::Ghost, 0);
        assert!(!run(&mut app, 0, 1500));
    }

    #[test]
    fn test_mic_toggle() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, true);
        app.command(Command::ToggleMic, 100);
        assert!(app.mic_running());
        assert_eq!(app.popup(), Some(Popup::MicOn(100)));
        app.command(Command::ToggleMic, 200);
        assert!(!app.mic_running());
        assert_eq!(app.popup(), Some(Popup::MicOff(200)));
    }

    #[test]
    fn test_mic_failure_reports_without_stopping_sensors() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, false);
        app.command(Command::Calibrate, 0);
        app.command(Command::ToggleMic, 100);

        assert!(!app.mic_running());
        assert_eq!(app.sink().status_text(), STATUS_MIC_ERROR);
        assert_eq!(app.detector().log().last().map(|e| e.level), Some(LogLevel::Error));
        assert!(app.detector().is_running());
    }

    #[test]
    fn test_denied_permission_can_be_retried() {
        let mut options = PlatformOptions::new(Tier::Events);
        options.deny_permission = true;
        let config = DetectorConfig::for_profile(Profile::Universal);
        let mut app = App::new(config, options, true, 0).unwrap();

        app.command(Command::Calibrate, 0);
        assert!(!app.detector().is_running());
        assert_eq!(app.sink().status_text(), STATUS_PERMISSION_DENIED);

        // A second press asks again instead of calibrating a dead pipeline
        app.command(Command::Calibrate, 500);
        run(&mut app, 500, 3000);
        assert!(!app.detector().is_running());
        assert!(!app.detector().calibration().any_calibrating());
        assert_eq!(app.sink().status_text(), STATUS_PERMISSION_DENIED);
        assert!(!app.platform().is_subscribed(SensorSource::DeviceOrientation));
    }

    #[test]
    fn test_popup_expires() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, true);
        app.command(Command::Ghost, 0);
        app.step(POPUP_DURATION_MS - FRAME_MS);
        assert!(app.popup().is_some());
        app.step(POPUP_DURATION_MS);
        assert!(app.popup().is_none());
    }

    #[test]
    fn test_page_toggle_clears_popup() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, true);
        app.command(Command::Ghost, 0);
        app.command(Command::TogglePage, 10);
        assert_eq!(app.page(), Page::Log);
        assert!(app.popup().is_none());
        app.command(Command::TogglePage, 20);
        assert_eq!(app.page(), Page::Detector);
    }

    #[test]
    fn test_stop_releases_everything() {
        let mut app = app(Tier::Sensors, Profile::Magnetometer, true);
        app.command(Command::Calibrate, 0);
        app.command(Command::ToggleMic, 0);
        run(&mut app, 0, 500);
        app.command(Command::Stop, 500);

        assert!(!app.detector().is_running());
        assert!(!app.mic_running());
        assert_eq!(app.sink().status_text(), STATUS_STOPPED);
        assert!(!app.platform().is_subscribed(SensorSource::Magnetometer));
    }

    #[test]
    fn test_headless_script_per_mode() {
        let timed = headless_script(&DetectorConfig::for_profile(Profile::Universal));
        assert_eq!(timed.iter().filter(|(_, c)| *c == Command::Calibrate).count(), 1);
        let instant = headless_script(&DetectorConfig::for_profile(Profile::Magnetometer));
        assert_eq!(instant.iter().filter(|(_, c)| *c == Command::Calibrate).count(), 2);
        assert!(instant.windows(2).all(|w| w[0].0 <= w[1].0));
    }
}

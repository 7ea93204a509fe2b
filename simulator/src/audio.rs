//! Simulated microphone spectrum.
//!
//! A cancellable periodic task: [`SpectrumTask::poll`] is called every frame
//! and produces a new 32-bin byte spectrum whenever the interval elapsed.
//! The spectrum is display-only and never feeds the alert.

use anyhow::bail;
use ghost_common::config::SPECTRUM_BINS;

/// Spectrum refresh interval, one display frame at 50 FPS.
pub const SPECTRUM_INTERVAL_MS: u64 = 20;

pub type Spectrum = [u8; SPECTRUM_BINS];

#[derive(Debug)]
pub struct SpectrumTask {
    mic_available: bool,
    running: bool,
    interval_ms: u64,
    next_due_ms: u64,
    latest: Spectrum,
}

/// Room tone: falling noise floor plus a mains hum around bins 2-3.
fn synthesize(t_ms: u64) -> Spectrum {
    let t = t_ms as f32 / 1000.0;
    let mut bins = [0u8; SPECTRUM_BINS];
    for (i, bin) in bins.iter_mut().enumerate() {
        let f = i as f32;
        let floor = 150.0 * (-f / 7.0).exp();
        let flutter = 40.0 * (t * 3.0 + f * 0.9).sin().abs();
        let hum = if i == 2 || i == 3 { 60.0 } else { 0.0 };
        *bin = (floor + flutter + hum).clamp(0.0, 255.0) as u8;
    }
    bins
}

impl SpectrumTask {
    pub const fn new(mic_available: bool) -> Self {
        Self {
            mic_available,
            running: false,
            interval_ms: SPECTRUM_INTERVAL_MS,
            next_due_ms: 0,
            latest: [0; SPECTRUM_BINS],
        }
    }

    /// Open the microphone. Returns `Ok(false)` if already running.
    pub fn start(
        &mut self,
        now_ms: u64,
    ) -> anyhow::Result<bool> {
        if self.running {
            return Ok(false);
        }
        if !self.mic_available {
            bail!("microphone unavailable");
        }
        self.running = true;
        self.next_due_ms = now_ms;
        Ok(true)
    }

    /// Produce a frame if one is due.
    pub fn poll(
        &mut self,
        now_ms: u64,
    ) -> Option<&Spectrum> {
        if !self.running || now_ms < self.next_due_ms {
            return None;
        }
        self.latest = synthesize(now_ms);
        self.next_due_ms = now_ms + self.interval_ms;
        Some(&self.latest)
    }

    /// Stop producing frames.
    pub fn cancel(&mut self) { self.running = false; }

    pub const fn is_running(&self) -> bool { self.running }

    /// Last frame while running.
    pub fn latest(&self) -> Option<&Spectrum> { self.running.then_some(&self.latest) }
}

// =============================================================================
// Unit Tests
// =============================================================================

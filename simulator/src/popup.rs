//! Popup state with time-based expiry on the session clock.

use crate::timing::POPUP_DURATION_MS;

/// Active popup with its start time in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Popup {
    Calibrate(u64),
    MicOn(u64),
    MicOff(u64),
    MicError(u64),
    Ghost(u64),
}

impl Popup {
    #[inline]
    pub const fn start_ms(&self) -> u64 {
        match *self {
            Self::Calibrate(t) | Self::MicOn(t) | Self::MicOff(t) | Self::MicError(t) | Self::Ghost(t) => t,
        }
    }

    #[inline]
    pub const fn is_expired(
        &self,
        now_ms: u64,
    ) -> bool {
        now_ms.saturating_sub(self.start_ms()) >= POPUP_DURATION_MS
    }

    pub const fn message(&self) -> &'static str {
        match self {
            Self::Calibrate(_) => "CALIBRATE",
            Self::MicOn(_) => "MIC ON",
            Self::MicOff(_) => "MIC OFF",
            Self::MicError(_) => "MIC ERROR",
            Self::Ghost(_) => "BOO!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let popup = Popup::MicOn(1000);
        assert!(!popup.is_expired(1000));
        assert!(!popup.is_expired(1000 + POPUP_DURATION_MS - 1));
        assert!(popup.is_expired(1000 + POPUP_DURATION_MS));
        // Clock behind the popup never expires it early
        assert!(!popup.is_expired(0));
    }

    #[test]
    fn test_messages() {
        assert_eq!(Popup::Ghost(0).message(), "BOO!");
        assert_eq!(Popup::MicError(0).message(), "MIC ERROR");
    }
}

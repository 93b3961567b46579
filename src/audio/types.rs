//! Small shared audio types: session state and run-loop timing.

use std::time::Duration;

use crate::config::AudioSettings;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session.
    Idle,
    /// A run-loop is playing (or about to play) the album.
    Playing,
    /// The run-loop ended on its own, e.g. no audio device; awaiting `stop`.
    Stopped,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Timing knobs of the playback run-loop.
#[derive(Debug, Clone)]
pub struct SessionTiming {
    /// How often a playing track is checked for completion.
    pub poll_step: Duration,
    /// Silence between two tracks.
    pub track_gap: Duration,
    /// Pause after a track failed to load, before the next one is tried.
    pub retry_delay: Duration,
    /// Upper bound on how long `stop` waits for the run-loop to exit.
    pub stop_timeout: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self::from(&AudioSettings::default())
    }
}

impl From<&AudioSettings> for SessionTiming {
    fn from(settings: &AudioSettings) -> Self {
        Self {
            poll_step: Duration::from_millis(100),
            track_gap: settings.track_gap(),
            retry_delay: settings.retry_delay(),
            stop_timeout: settings.stop_timeout(),
        }
    }
}

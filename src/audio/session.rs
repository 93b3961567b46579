use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;

use rand::Rng;
use tracing::{info, warn};

use super::backend::AudioBackend;
use super::order::shuffle_tracks;
use super::run_loop::{Shared, spawn_run_loop};
use super::types::{SessionState, SessionTiming};
use crate::error::{Error, Result};
use crate::library::Track;

/// Plays at most one album at a time.
///
/// `start` joins the previous run-loop before spawning the next, so two
/// run-loops never play at once.
pub struct PlaybackSession {
    backend: Arc<dyn AudioBackend>,
    timing: SessionTiming,
    run: Option<Run>,
}

struct Run {
    shared: Arc<Shared>,
    worker: JoinHandle<()>,
    done: Receiver<()>,
    shuffled: bool,
}

impl PlaybackSession {
    pub fn new(backend: Arc<dyn AudioBackend>, timing: SessionTiming) -> Self {
        Self {
            backend,
            timing,
            run: None,
        }
    }

    /// Start playing `tracks` from the first one, shuffled if asked.
    pub fn start(&mut self, tracks: Vec<Track>, shuffle: bool) -> Result<()> {
        self.start_with_rng(tracks, shuffle, &mut rand::rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        mut tracks: Vec<Track>,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<()> {
        if tracks.is_empty() {
            return Err(Error::InvalidAlbum);
        }

        if let Err(e) = self.stop() {
            warn!(error = %e, "previous session did not stop cleanly");
        }

        if shuffle {
            shuffle_tracks(&mut tracks, rng);
        }
        let count = tracks.len();

        let shared = Arc::new(Shared::new(tracks));
        let (worker, done) =
            spawn_run_loop(shared.clone(), self.backend.clone(), self.timing.clone())?;
        self.run = Some(Run {
            shared,
            worker,
            done,
            shuffled: shuffle,
        });

        info!(tracks = count, shuffle, "playback session started");
        Ok(())
    }

    /// Stop playback and wait for the run-loop to exit.
    ///
    /// Gives up after the stop timeout with `SessionStopTimeout`; the stale
    /// thread is detached and owns nothing the next session uses.
    pub fn stop(&mut self) -> Result<()> {
        let Some(run) = self.run.take() else {
            return Ok(());
        };

        if let Some(sink) = run.shared.deactivate() {
            sink.halt();
        }

        match run.done.recv_timeout(self.timing.stop_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if run.worker.join().is_err() {
                    warn!("playback thread panicked");
                }
                info!(shuffled = run.shuffled, "playback session stopped");
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => Err(Error::SessionStopTimeout(self.timing.stop_timeout)),
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.run {
            None => SessionState::Idle,
            Some(run) if run.shared.lock().active => SessionState::Playing,
            Some(_) => SessionState::Stopped,
        }
    }

    /// The track currently loaded, or `None` when idle.
    pub fn current_track(&self) -> Option<Track> {
        let run = self.run.as_ref()?;
        let st = run.shared.lock();
        if st.active { st.current.clone() } else { None }
    }

    pub fn position(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.shared.lock().position)
    }

    /// Play order of the current session.
    pub fn tracks(&self) -> Vec<Track> {
        self.run
            .as_ref()
            .map(|run| run.shared.lock().tracks.clone())
            .unwrap_or_default()
    }

    pub fn is_shuffled(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.shuffled)
    }

    /// Whether a run-loop thread is owned by this session.
    #[cfg(test)]
    pub fn has_worker(&self) -> bool {
        self.run.is_some()
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "playback session dropped while running");
        }
    }
}

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use super::backend::{AudioBackend, TrackSink};
use super::types::SessionTiming;
use crate::library::Track;

/// State shared between one session's run-loop and its owner.
///
/// `active` is only read and written under `state`, together with
/// `position`, so the loop cannot advance after a stop cleared the flag.
pub(super) struct Shared {
    state: Mutex<RunState>,
    wake: Condvar,
}

pub(super) struct RunState {
    pub active: bool,
    pub tracks: Vec<Track>,
    pub position: usize,
    pub current: Option<Track>,
    sink: Option<Arc<dyn TrackSink>>,
}

impl Shared {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            state: Mutex::new(RunState {
                active: true,
                tracks,
                position: 0,
                current: None,
                sink: None,
            }),
            wake: Condvar::new(),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear `active` and wake the loop. Returns the sink to halt, if any.
    pub fn deactivate(&self) -> Option<Arc<dyn TrackSink>> {
        let mut st = self.lock();
        st.active = false;
        let sink = st.sink.take();
        self.wake.notify_all();
        sink
    }

    /// Mark the track at `position` as loaded; `None` if the session ended.
    fn load_current(&self) -> Option<(Track, usize, usize)> {
        let mut st = self.lock();
        if !st.active {
            return None;
        }
        let track = st.tracks[st.position].clone();
        st.current = Some(track.clone());
        Some((track, st.position, st.tracks.len()))
    }

    fn install_sink(&self, sink: Arc<dyn TrackSink>) -> bool {
        let mut st = self.lock();
        if !st.active {
            return false;
        }
        st.sink = Some(sink);
        true
    }

    /// Block until `sink` finishes. False if the session was stopped first.
    fn wait_for_end(&self, sink: &dyn TrackSink, step: Duration) -> bool {
        let mut st = self.lock();
        loop {
            if !st.active {
                return false;
            }
            if sink.is_finished() {
                st.sink = None;
                return true;
            }
            st = self
                .wake
                .wait_timeout(st, step)
                .map(|(g, _)| g)
                .unwrap_or_else(|e| e.into_inner().0);
        }
    }

    /// Move to the next track, wrapping to the first. False if stopped.
    fn advance(&self) -> bool {
        let mut st = self.lock();
        if !st.active {
            return false;
        }
        st.position = (st.position + 1) % st.tracks.len();
        true
    }

    /// Sleep for `d` unless stopped sooner. False if stopped.
    fn pause(&self, d: Duration) -> bool {
        let deadline = Instant::now() + d;
        let mut st = self.lock();
        while st.active {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            st = self
                .wake
                .wait_timeout(st, deadline - now)
                .map(|(g, _)| g)
                .unwrap_or_else(|e| e.into_inner().0);
        }
        false
    }

    fn finish(&self) {
        let mut st = self.lock();
        st.active = false;
        st.current = None;
        if let Some(sink) = st.sink.take() {
            sink.halt();
        }
    }
}

/// Spawn the run-loop. The receiver fires (or disconnects) once it has exited.
pub(super) fn spawn_run_loop(
    shared: Arc<Shared>,
    backend: Arc<dyn AudioBackend>,
    timing: SessionTiming,
) -> io::Result<(JoinHandle<()>, Receiver<()>)> {
    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("playback".into())
        .spawn(move || {
            run(&shared, backend.as_ref(), &timing);
            shared.finish();
            let _ = done_tx.send(());
        })?;
    Ok((handle, done_rx))
}

fn run(shared: &Shared, backend: &dyn AudioBackend, timing: &SessionTiming) {
    let mut device = match backend.connect() {
        Ok(device) => device,
        Err(e) => {
            error!(error = %e, "cannot open audio output, ending session");
            return;
        }
    };

    // Consecutive tracks that failed to load.
    let mut failures = 0usize;

    while let Some((track, index, count)) = shared.load_current() {
        debug!(track = %track.name, index = index + 1, count, "now playing");

        match device.play(&track) {
            Ok(sink) => {
                failures = 0;
                if !shared.install_sink(sink.clone()) {
                    sink.halt();
                    return;
                }
                if !shared.wait_for_end(sink.as_ref(), timing.poll_step) {
                    return;
                }
                if !shared.advance() || !shared.pause(timing.track_gap) {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping track");
                failures += 1;
                if failures == count {
                    error!(count, "no track of this album could be played");
                    failures = 0;
                }
                if !shared.advance() || !shared.pause(timing.retry_delay) {
                    return;
                }
            }
        }
    }
}

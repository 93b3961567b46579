//! Fakes shared by the unit tests.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::activity::{ActivityAction, ActivityEvent, ActivityRecorder};
use crate::audio::{AudioBackend, AudioDevice, SessionTiming, TrackSink};
use crate::error::{Error, Result};
use crate::library::Track;
use crate::tag::{ReadError, TagId, TagReader};

pub fn fast_timing() -> SessionTiming {
    SessionTiming {
        poll_step: Duration::from_millis(2),
        track_gap: Duration::from_millis(1),
        retry_delay: Duration::from_millis(1),
        stop_timeout: Duration::from_secs(2),
    }
}

pub fn fake_tracks(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|n| Track::new(PathBuf::from("/music/Album").join(n), None))
        .collect()
}

/// Poll `f` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut f: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if f() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    f()
}

/// Reader that replays queued results, then reports no tag.
///
/// Clones share the queue, so a test can keep feeding a reader it moved
/// into a `TagSensor`.
#[derive(Clone, Default)]
pub struct ScriptedReader {
    reads: Arc<Mutex<VecDeque<std::result::Result<Option<TagId>, ReadError>>>>,
    releases: Arc<AtomicUsize>,
}

impl ScriptedReader {
    pub fn push(&self, read: std::result::Result<Option<TagId>, ReadError>) {
        self.reads.lock().unwrap().push_back(read);
    }

    pub fn push_tag(&self, id: &str) {
        self.push(Ok(Some(TagId::new(id))));
    }

    pub fn push_none(&self) {
        self.push(Ok(None));
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl TagReader for ScriptedReader {
    fn read(&mut self) -> std::result::Result<Option<TagId>, ReadError> {
        self.reads.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Audio backend that plays nothing and records what it was asked to play.
#[derive(Clone, Default)]
pub struct FakeBackend {
    /// `None`: tracks play until halted.
    pub track_length: Option<Duration>,
    /// Time spent inside `play` before returning.
    pub play_delay: Duration,
    /// File names that fail to load.
    pub failing: HashSet<String>,
    pub no_device: bool,
    entered: Arc<AtomicUsize>,
    played: Arc<Mutex<Vec<String>>>,
    sinks: Arc<Mutex<Vec<Arc<FakeSink>>>>,
}

impl FakeBackend {
    pub fn with_track_length(d: Duration) -> Self {
        Self {
            track_length: Some(d),
            ..Self::default()
        }
    }

    pub fn with_play_delay(d: Duration) -> Self {
        Self {
            play_delay: d,
            ..Self::default()
        }
    }

    pub fn without_device() -> Self {
        Self {
            no_device: true,
            ..Self::default()
        }
    }

    /// Calls that have entered `play`, including ones still inside it.
    pub fn plays_entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    /// Every `play` attempt, in order, failures included.
    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    /// Sinks neither finished nor halted.
    pub fn live_sinks(&self) -> usize {
        self.sinks
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.is_finished())
            .count()
    }

    pub fn shared(&self) -> Arc<dyn AudioBackend> {
        Arc::new(self.clone())
    }
}

impl AudioBackend for FakeBackend {
    fn connect(&self) -> Result<Box<dyn AudioDevice>> {
        if self.no_device {
            return Err(Error::AudioOutput("no fake device".into()));
        }
        Ok(Box::new(FakeDevice {
            backend: self.clone(),
        }))
    }
}

struct FakeDevice {
    backend: FakeBackend,
}

impl AudioDevice for FakeDevice {
    fn play(&mut self, track: &Track) -> Result<Arc<dyn TrackSink>> {
        self.backend.entered.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.backend.play_delay);
        self.backend.played.lock().unwrap().push(track.name.clone());
        if self.backend.failing.contains(&track.name) {
            return Err(Error::TrackLoad {
                path: track.path.clone(),
                reason: "fake decode failure".into(),
            });
        }
        let sink = Arc::new(FakeSink {
            finish_at: self.backend.track_length.map(|d| Instant::now() + d),
            halted: AtomicBool::new(false),
        });
        self.backend.sinks.lock().unwrap().push(sink.clone());
        Ok(sink as Arc<dyn TrackSink>)
    }
}

struct FakeSink {
    finish_at: Option<Instant>,
    halted: AtomicBool,
}

impl TrackSink for FakeSink {
    fn is_finished(&self) -> bool {
        self.halted.load(Ordering::SeqCst) || self.finish_at.is_some_and(|t| Instant::now() >= t)
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MemoryRecorder {
    pub events: Vec<ActivityEvent>,
}

impl MemoryRecorder {
    pub fn actions(&self) -> Vec<ActivityAction> {
        self.events.iter().map(|e| e.action).collect()
    }
}

impl ActivityRecorder for MemoryRecorder {
    fn record(&mut self, event: ActivityEvent) {
        self.events.push(event);
    }
}

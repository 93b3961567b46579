//! Audio output seams and the `rodio` implementation.
//!
//! `AudioBackend` is shared with the session; `connect` runs on the
//! run-loop thread, so the device it returns never has to cross threads.
//! Sinks do: `stop` halts them from the controller thread.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::error::{Error, Result};
use crate::library::Track;

/// One track being played.
pub trait TrackSink: Send + Sync {
    /// True once the track played to the end or was halted.
    fn is_finished(&self) -> bool;
    /// Stop output immediately.
    fn halt(&self);
}

/// An open output device. Lives on the run-loop thread.
pub trait AudioDevice {
    /// Load `track` and begin playing it.
    fn play(&mut self, track: &Track) -> Result<Arc<dyn TrackSink>>;
}

pub trait AudioBackend: Send + Sync {
    fn connect(&self) -> Result<Box<dyn AudioDevice>>;
}

/// Default output device through `rodio`.
pub struct RodioBackend {
    volume: f32,
}

impl RodioBackend {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl AudioBackend for RodioBackend {
    fn connect(&self) -> Result<Box<dyn AudioDevice>> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::AudioOutput(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, once per session.
        stream.log_on_drop(false);
        Ok(Box::new(RodioDevice {
            stream,
            volume: self.volume,
        }))
    }
}

struct RodioDevice {
    stream: OutputStream,
    volume: f32,
}

impl AudioDevice for RodioDevice {
    fn play(&mut self, track: &Track) -> Result<Arc<dyn TrackSink>> {
        let load_err = |reason: String| Error::TrackLoad {
            path: track.path.clone(),
            reason,
        };
        let file = File::open(&track.path).map_err(|e| load_err(e.to_string()))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| load_err(e.to_string()))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.play();
        Ok(Arc::new(RodioSink(sink)))
    }
}

struct RodioSink(Sink);

impl TrackSink for RodioSink {
    fn is_finished(&self) -> bool {
        self.0.empty()
    }

    fn halt(&self) {
        self.0.stop();
    }
}

//! The poll loop: reconciles what the tag reader sees with what is playing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::activity::{ActivityAction, ActivityEvent, ActivityRecorder, UNKNOWN_ALBUM};
use crate::audio::PlaybackSession;
use crate::config::AlbumMapping;
use crate::library::LibraryIndex;
use crate::tag::{TagId, TagReader, TagSensor};

/// What a single poll changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    /// A new album started playing.
    Started,
    /// A mapped tag arrived but its album cannot be played.
    Unplayable,
    UnknownTag,
    /// The tag was removed and its album stopped.
    Stopped,
    /// A tag that started nothing was removed.
    Cleared,
}

pub struct SessionController<R: TagReader, A: ActivityRecorder> {
    sensor: TagSensor<R>,
    session: PlaybackSession,
    library: LibraryIndex,
    mappings: HashMap<TagId, AlbumMapping>,
    recorder: A,
    poll_interval: Duration,
    /// Tag seen on the previous poll.
    observed: Option<TagId>,
    /// Tag whose album the session is playing.
    playing: Option<(TagId, AlbumMapping)>,
}

impl<R: TagReader, A: ActivityRecorder> SessionController<R, A> {
    pub fn new(
        sensor: TagSensor<R>,
        session: PlaybackSession,
        library: LibraryIndex,
        mappings: HashMap<TagId, AlbumMapping>,
        recorder: A,
        poll_interval: Duration,
    ) -> Self {
        Self {
            sensor,
            session,
            library,
            mappings,
            recorder,
            poll_interval,
            observed: None,
            playing: None,
        }
    }

    /// Poll until `shutdown` is raised.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::SeqCst) {
            self.tick();
            thread::sleep(self.poll_interval);
        }
    }

    /// One poll of the reader and the resulting transition, if any.
    ///
    /// A single empty read counts as removal; there is no debounce window.
    pub fn tick(&mut self) -> TickOutcome {
        let tag = match self.sensor.poll() {
            Ok(tag) => tag,
            Err(e) => {
                warn!(error = %e, "tag read failed");
                None
            }
        };

        match tag {
            Some(tag) if self.observed.as_ref() == Some(&tag) => TickOutcome::NoChange,
            Some(tag) => {
                let outcome = self.on_new_tag(&tag);
                self.observed = Some(tag);
                outcome
            }
            None => match self.observed.take() {
                Some(_) => self.on_tag_removed(),
                None => TickOutcome::NoChange,
            },
        }
    }

    fn on_new_tag(&mut self, tag: &TagId) -> TickOutcome {
        let Some(mapping) = self.mappings.get(tag).cloned() else {
            warn!(tag = %tag, "unknown tag, add it to nfc_mappings to map it to an album");
            self.recorder.record(ActivityEvent::now(
                tag.clone(),
                UNKNOWN_ALBUM,
                ActivityAction::UnknownTag,
            ));
            return TickOutcome::UnknownTag;
        };

        let tracks = match self.library.locate(&mapping.album) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(tag = %tag, error = %e, "cannot play mapped album");
                return TickOutcome::Unplayable;
            }
        };

        self.finish_playing();

        if let Err(e) = self.session.start(tracks, mapping.shuffle) {
            warn!(tag = %tag, album = %mapping.album, error = %e, "failed to start playback");
            return TickOutcome::Unplayable;
        }

        info!(tag = %tag, album = %mapping.album, shuffle = mapping.shuffle, "tag detected, playing album");
        self.recorder.record(ActivityEvent::now(
            tag.clone(),
            mapping.album.clone(),
            ActivityAction::started(mapping.shuffle),
        ));
        self.playing = Some((tag.clone(), mapping));
        TickOutcome::Started
    }

    fn on_tag_removed(&mut self) -> TickOutcome {
        if self.finish_playing() {
            TickOutcome::Stopped
        } else {
            TickOutcome::Cleared
        }
    }

    /// Stop the playing album, if any, and record it. True if one was playing.
    fn finish_playing(&mut self) -> bool {
        let Some((tag, mapping)) = self.playing.take() else {
            return false;
        };

        info!(tag = %tag, album = %mapping.album, "stopping playback");
        if let Err(e) = self.session.stop() {
            warn!(error = %e, "playback did not stop cleanly");
        }
        self.recorder.record(ActivityEvent::now(
            tag,
            mapping.album,
            ActivityAction::stopped(mapping.shuffle),
        ));
        true
    }

    /// Stop playback and release the reader.
    pub fn shutdown(&mut self) {
        self.finish_playing();
        self.sensor.cleanup();
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn sensor(&self) -> &TagSensor<R> {
        &self.sensor
    }

    pub fn recorder(&self) -> &A {
        &self.recorder
    }

    pub fn observed(&self) -> Option<&TagId> {
        self.observed.as_ref()
    }
}

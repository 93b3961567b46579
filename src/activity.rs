//! Activity log: one line per tag event, append-only.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::error::Result;
use crate::tag::TagId;

/// Album name recorded for tags without a mapping.
pub const UNKNOWN_ALBUM: &str = "Unknown";

/// Album column of the line written when the player starts.
pub const SYSTEM_ALBUM: &str = "Music Player";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActivityAction {
    Started,
    StartedShuffled,
    Stopped,
    StoppedShuffled,
    UnknownTag,
}

impl ActivityAction {
    pub fn started(shuffle: bool) -> Self {
        if shuffle {
            Self::StartedShuffled
        } else {
            Self::Started
        }
    }

    pub fn stopped(shuffle: bool) -> Self {
        if shuffle {
            Self::StoppedShuffled
        } else {
            Self::Stopped
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::StartedShuffled => "started_shuffled",
            Self::Stopped => "stopped",
            Self::StoppedShuffled => "stopped_shuffled",
            Self::UnknownTag => "unknown_tag",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an event is about: a tag on the reader, or the player itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Tag(TagId),
    System,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(id) => id.fmt(f),
            Self::System => f.write_str("SYSTEM"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub timestamp: DateTime<Local>,
    pub source: EventSource,
    pub album: String,
    pub action: ActivityAction,
}

impl ActivityEvent {
    pub fn now(tag_id: TagId, album: impl Into<String>, action: ActivityAction) -> Self {
        Self {
            timestamp: Local::now(),
            source: EventSource::Tag(tag_id),
            album: album.into(),
            action,
        }
    }

    /// Marks a process start in the log.
    pub fn system_started() -> Self {
        Self {
            timestamp: Local::now(),
            source: EventSource::System,
            album: SYSTEM_ALBUM.into(),
            action: ActivityAction::Started,
        }
    }

    /// `2024-01-31 18:04:05 | NFC: 111 | Album: Jazz | Action: started`
    pub fn to_line(&self) -> String {
        format!(
            "{} | NFC: {} | Album: {} | Action: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.source,
            self.album,
            self.action
        )
    }
}

/// Sink for activity events.
pub trait ActivityRecorder {
    fn record(&mut self, event: ActivityEvent);
}

/// Appends events to a text file and mirrors them to the log.
pub struct ActivityLog {
    path: PathBuf,
    file: Option<File>,
}

impl ActivityLog {
    /// Open `path` for appending, creating its directory if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    /// A log that only reaches `tracing`, for when the file cannot be opened.
    pub fn log_only(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            file: None,
        }
    }
}

impl ActivityRecorder for ActivityLog {
    fn record(&mut self, event: ActivityEvent) {
        info!(
            target: "tagplay::activity",
            tag = %event.source,
            album = %event.album,
            action = %event.action,
            "activity"
        );

        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = writeln!(file, "{}", event.to_line()) {
            warn!(path = %self.path.display(), error = %e, "failed to write activity log");
        }
    }
}

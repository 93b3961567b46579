//! Error types shared across the player.
//!
//! Only config and hardware-acquisition errors are fatal; the runtime logs
//! everything else and keeps polling.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No config file at the resolved path.
    #[error("config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    /// Config file exists but could not be parsed or failed validation.
    #[error("malformed config: {0}")]
    ConfigMalformed(String),

    /// The tag reader could not be opened at startup.
    #[error("failed to acquire tag reader: {0}")]
    HardwareAcquisition(String),

    /// Unexpected (non-transient) failure while reading the tag reader.
    #[error("tag reader fault: {0}")]
    Hardware(String),

    /// Mapped album has no directory under the library root.
    #[error("album not found: {0}")]
    AlbumNotFound(String),

    /// Album directory exists but holds no playable tracks.
    #[error("album has no playable tracks: {0}")]
    EmptyAlbum(String),

    /// A session was started with an empty track list.
    #[error("cannot start a session without tracks")]
    InvalidAlbum,

    #[error("failed to load {}: {reason}", path.display())]
    TrackLoad { path: PathBuf, reason: String },

    /// No audio output device could be opened.
    #[error("audio output error: {0}")]
    AudioOutput(String),

    /// The run-loop did not exit within the stop timeout.
    #[error("playback thread did not stop within {0:?}")]
    SessionStopTimeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

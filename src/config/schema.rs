use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::tag::TagId;

/// Top-level settings loaded from `config.json`.
///
/// File format: JSON (TOML is accepted when the file has a `.toml` extension)
/// Default path: `./config.json`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAGPLAY__`, `__` as nested separator)
/// 2) Config file
/// 3) Struct defaults (only for the optional sections)
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root of the music library; each subdirectory is an album.
    pub usb_mount_path: PathBuf,
    /// Tag ID -> album, as stored on disk.
    pub nfc_mappings: HashMap<String, MappingEntry>,
    #[serde(default)]
    pub audio_settings: AudioSettings,
    #[serde(default)]
    pub reader: ReaderSettings,
    #[serde(default)]
    pub library: LibrarySettings,
    /// Where activity events are appended.
    #[serde(default = "default_activity_log")]
    pub activity_log: PathBuf,
}

fn default_activity_log() -> PathBuf {
    PathBuf::from("logs").join("activity.log")
}

impl Settings {
    /// Normalized tag mappings, keyed by tag.
    pub fn mappings(&self) -> HashMap<TagId, AlbumMapping> {
        self.nfc_mappings
            .iter()
            .map(|(id, entry)| (TagId::new(id), AlbumMapping::from(entry.clone())))
            .collect()
    }
}

/// One `nfc_mappings` value as it appears on disk.
///
/// Older config files map a tag straight to an album name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MappingEntry {
    Legacy(String),
    Full {
        album: String,
        #[serde(default)]
        shuffle: bool,
    },
}

/// The album a tag plays, and whether to shuffle it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumMapping {
    pub album: String,
    pub shuffle: bool,
}

impl From<MappingEntry> for AlbumMapping {
    fn from(entry: MappingEntry) -> Self {
        match entry {
            MappingEntry::Legacy(album) => Self {
                album,
                shuffle: false,
            },
            MappingEntry::Full { album, shuffle } => Self { album, shuffle },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output volume, 0.0 to 1.0.
    pub volume: f32,
    /// Silence between two tracks (milliseconds).
    pub track_gap_ms: u64,
    /// Pause before trying the next track after a load failure (milliseconds).
    pub retry_delay_ms: u64,
    /// How long `stop` waits for the playback thread to exit (milliseconds).
    pub stop_timeout_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            track_gap_ms: 500,
            retry_delay_ms: 1000,
            stop_timeout_ms: 2000,
        }
    }
}

impl AudioSettings {
    pub fn track_gap(&self) -> Duration {
        Duration::from_millis(self.track_gap_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReaderBackend {
    /// MFRC522 over spidev. Needs the `rc522` cargo feature.
    #[serde(alias = "mfrc522")]
    Rc522,
    /// Current tag ID read from a text file.
    File,
}

impl Default for ReaderBackend {
    fn default() -> Self {
        if cfg!(feature = "rc522") {
            Self::Rc522
        } else {
            Self::File
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    pub backend: ReaderBackend,
    /// spidev node the RC522 is wired to.
    pub spi_device: PathBuf,
    /// File watched by the `file` backend.
    pub tag_file: PathBuf,
    /// Poll period of the controller loop (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            backend: ReaderBackend::default(),
            spi_device: PathBuf::from("/dev/spidev0.0"),
            tag_file: PathBuf::from("/run/tagplay/tag"),
            poll_interval_ms: 500,
        }
    }
}

impl ReaderSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinked album directories.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            follow_links: true,
        }
    }
}

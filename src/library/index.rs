use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::model::Track;
use super::scan::{is_hidden, scan_album};

/// Album name -> tracks in canonical (file name) order.
pub struct LibraryIndex {
    root: PathBuf,
    settings: LibrarySettings,
    albums: HashMap<String, Vec<Track>>,
}

impl LibraryIndex {
    /// Scan every album under `root`. Directories without playable files are
    /// left out.
    pub fn build(root: &Path, settings: &LibrarySettings) -> Self {
        let mut albums = HashMap::new();

        if root.is_dir() {
            let dirs = WalkDir::new(root)
                .min_depth(1)
                .max_depth(1)
                .follow_links(settings.follow_links)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_dir() && !is_hidden(e.path()));

            for entry in dirs {
                let tracks = scan_album(entry.path(), settings);
                if tracks.is_empty() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                albums.insert(name, tracks);
            }
            info!(root = %root.display(), albums = albums.len(), "music library indexed");
        } else {
            warn!(root = %root.display(), "music library not found, waiting for USB drive");
        }

        Self {
            root: root.to_path_buf(),
            settings: settings.clone(),
            albums,
        }
    }

    /// Tracks of `album`, or why it cannot be played.
    ///
    /// Albums missing from the startup index are looked up on disk, for
    /// drives mounted after startup.
    pub fn locate(&self, album: &str) -> Result<Vec<Track>> {
        if let Some(tracks) = self.albums.get(album) {
            return Ok(tracks.clone());
        }

        let dir = self.root.join(album);
        if !dir.is_dir() {
            return Err(Error::AlbumNotFound(album.to_string()));
        }
        let tracks = scan_album(&dir, &self.settings);
        if tracks.is_empty() {
            return Err(Error::EmptyAlbum(album.to_string()));
        }
        Ok(tracks)
    }

    pub fn resolve(&self, album: &str) -> Option<Vec<Track>> {
        self.locate(album).ok()
    }

    pub fn contains(&self, album: &str) -> bool {
        self.albums.contains_key(album)
    }

    /// Indexed album names, sorted.
    pub fn album_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.albums.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

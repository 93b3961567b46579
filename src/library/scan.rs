use std::path::Path;

use lofty::prelude::AudioFile;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

pub(super) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the playable tracks directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. An unreadable or missing
/// directory yields no tracks.
pub fn scan_album(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(settings.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| !is_hidden(p) && is_audio_file(p, settings))
        .map(|p| {
            let duration = lofty::read_from_path(&p)
                .ok()
                .map(|tagged| tagged.properties().duration());
            Track::new(p, duration)
        })
        .collect()
}

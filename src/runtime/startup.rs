use std::path::Path;

use tracing::{info, warn};

use crate::activity::{ActivityEvent, ActivityLog, ActivityRecorder};
use crate::config::Settings;
use crate::library::LibraryIndex;

/// Log which mapped albums can be played and which cannot.
pub fn announce_mappings(settings: &Settings, library: &LibraryIndex) {
    let mut mappings: Vec<_> = settings.mappings().into_iter().collect();
    mappings.sort_by(|a, b| a.1.album.cmp(&b.1.album));

    for (tag, mapping) in &mappings {
        if library.contains(&mapping.album) {
            info!(tag = %tag, album = %mapping.album, shuffle = mapping.shuffle, "album mapped");
        } else {
            warn!(tag = %tag, album = %mapping.album, "mapped album not in library");
        }
    }
    info!(albums = ?library.album_names(), "albums available");
}

/// Open the activity log, falling back to log-only recording, and record
/// the player start.
pub fn open_activity_log(path: &Path) -> ActivityLog {
    let mut log = match ActivityLog::open(path) {
        Ok(log) => log,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open activity log, events go to the log only");
            ActivityLog::log_only(path)
        }
    };
    log.record(ActivityEvent::system_started());
    log
}

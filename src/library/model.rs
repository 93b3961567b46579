use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    /// File name, used in logs.
    pub name: String,
    /// Read from the file's properties when the album was scanned.
    pub duration: Option<Duration>,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>, duration: Option<Duration>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self {
            path,
            name,
            duration,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

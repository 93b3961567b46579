use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::id::TagId;
use super::sensor::{ReadError, TagReader};

/// Reads the current tag ID from a text file maintained by another process.
///
/// A missing or blank file means no tag is present.
pub struct FileTagReader {
    path: PathBuf,
}

impl FileTagReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TagReader for FileTagReader {
    fn read(&mut self) -> Result<Option<TagId>, ReadError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                let id = s.lines().next().map(str::trim).unwrap_or_default();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(TagId::new(id)))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // The writer may be replacing the file mid-read.
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(ReadError::Transient(e.to_string())),
            Err(e) => Err(ReadError::Fault(format!("{}: {e}", self.path.display()))),
        }
    }
}

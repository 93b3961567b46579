use tracing::{debug, info};

use super::id::TagId;
use crate::error::{Error, Result};

/// How a single reader read failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Expected RF noise: failed anticollision, CRC or authentication.
    Transient(String),
    /// Anything else; the reader is probably miswired or gone.
    Fault(String),
}

/// One hardware reader backend.
pub trait TagReader: Send {
    /// One non-blocking read. `Ok(None)` means no tag in the field.
    fn read(&mut self) -> std::result::Result<Option<TagId>, ReadError>;

    /// Release the underlying device. Called at most once by `TagSensor`.
    fn release(&mut self) {}
}

/// Poll-contract wrapper around a `TagReader`.
///
/// The reader is released on `cleanup` or, failing that, on drop.
pub struct TagSensor<R: TagReader> {
    reader: Option<R>,
}

impl<R: TagReader> TagSensor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    /// A sensor whose acquisition failed: polls report no tag, cleanup is a no-op.
    #[cfg(test)]
    pub fn unacquired() -> Self {
        Self { reader: None }
    }

    /// Read the tag currently on the reader, if any.
    ///
    /// Transient read noise is reported as "no tag"; a real fault comes back
    /// as `Error::Hardware` for the caller to log.
    pub fn poll(&mut self) -> Result<Option<TagId>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        match reader.read() {
            Ok(tag) => Ok(tag),
            Err(ReadError::Transient(reason)) => {
                debug!(%reason, "ignoring transient tag read error");
                Ok(None)
            }
            Err(ReadError::Fault(reason)) => Err(Error::Hardware(reason)),
        }
    }

    pub fn is_released(&self) -> bool {
        self.reader.is_none()
    }

    /// Release the hardware handle. Safe to call any number of times.
    pub fn cleanup(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.release();
            info!("tag reader released");
        }
    }
}

impl<R: TagReader> Drop for TagSensor<R> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

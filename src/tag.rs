//! Tag reading: the `TagSensor` wrapper and its reader backends.
//!
//! A backend only knows how to ask the hardware "which tag is on the reader
//! right now"; `TagSensor` turns its errors into the poll contract the
//! controller relies on.

mod file;
mod id;
#[cfg(feature = "rc522")]
mod rc522;
mod sensor;

pub use file::FileTagReader;
pub use id::TagId;
#[cfg(feature = "rc522")]
pub use rc522::Rc522Reader;
pub use sensor::{ReadError, TagReader, TagSensor};

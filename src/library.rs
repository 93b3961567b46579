//! Music library: albums are the immediate subdirectories of the library
//! root, tracks the audio files directly inside them.

mod index;
mod model;
mod scan;

pub use index::LibraryIndex;
pub use model::Track;
pub use scan::scan_album;

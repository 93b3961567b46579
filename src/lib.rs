//! tagplay: plays the album mapped to whichever NFC tag sits on the reader.
//!
//! The `controller` polls a `tag::TagSensor` and drives one
//! `audio::PlaybackSession` over albums found by `library::LibraryIndex`.

pub mod activity;
pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod library;
pub mod runtime;
pub mod tag;

pub use error::{Error, Result};

#[cfg(test)]
mod test_support;

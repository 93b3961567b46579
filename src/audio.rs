//! Album playback: the `PlaybackSession` state machine and its audio backends.
//!
//! A session owns one background run-loop thread that plays the album's
//! tracks in order, looping, until `stop` is called.

mod backend;
mod order;
mod run_loop;
mod session;
mod types;

pub use backend::{AudioBackend, AudioDevice, RodioBackend, TrackSink};
pub use order::shuffle_tracks;
pub use session::PlaybackSession;
pub use types::{SessionState, SessionTiming};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::library::Track;

/// Permute `tracks` uniformly at random, in place.
///
/// Only the order changes; the caller keeps the sorted base order elsewhere
/// if it needs it again.
pub fn shuffle_tracks<R: Rng + ?Sized>(tracks: &mut [Track], rng: &mut R) {
    tracks.shuffle(rng);
}

//! Repeat expansion
//!
//! Repetition is realized entirely by duplicating queue entries before the
//! queue reaches the audio engine. Duplicates keep the exact `verse_key` of
//! the original and are told apart only by their physical position.
//!
//! Any change here must keep the same-key adjacency rules the navigator
//! depends on:
//! - `One`: copies of a verse are contiguous (`[A, A, B, B]`)
//! - `All`: the selection repeats as a whole (`[A, B, A, B]`)

use tilawa_core::{LogicalTrack, RepeatConfig, RepeatMode};

/// Build the physical queue for a list of logical tracks
///
/// ```text
/// tracks = [A, B, C], count = 2
///
/// Off -> [A, B, C]
/// One -> [A, A, B, B, C, C]
/// All -> [A, B, C, A, B, C]
/// ```
pub fn expand(tracks: Vec<LogicalTrack>, repeat: RepeatConfig) -> Vec<LogicalTrack> {
    if !repeat.is_active() {
        return tracks;
    }

    let count = usize::from(repeat.count());
    match repeat.mode {
        RepeatMode::Off => tracks,
        RepeatMode::One => tracks
            .iter()
            .flat_map(|track| std::iter::repeat(track).take(count))
            .cloned()
            .collect(),
        RepeatMode::All => {
            let mut queue = Vec::with_capacity(tracks.len() * count);
            for _ in 0..count {
                queue.extend_from_slice(&tracks);
            }
            queue
        }
    }
}

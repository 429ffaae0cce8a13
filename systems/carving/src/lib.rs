#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that carves the maze by offering wall passages in random order.
//!
//! Offering every candidate passage exactly once, one at a time, in a
//! uniformly shuffled order builds a random spanning forest over each level:
//! a passage opens only when it joins two rooms that are not connected yet.

use castle_maze_core::{Command, WallPassage};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

/// Pure system emitting one [`Command::OfferPassages`] per carving pass.
#[derive(Debug, Default)]
pub struct Carving {
    scratch: Vec<WallPassage>,
}

impl Carving {
    /// Creates a carving system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffles the candidate passages and requests that they be offered.
    ///
    /// Nothing is emitted when there are no candidates.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        candidates: &[WallPassage],
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        if candidates.is_empty() {
            return;
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(candidates);
        self.scratch.shuffle(rng);

        debug!(passages = self.scratch.len(), "offering shuffled passages");
        out.push(Command::OfferPassages {
            passages: self.scratch.clone(),
        });
    }
}

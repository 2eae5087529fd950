//! RNG module - per-lane 7-bag piece queues
//!
//! Each lane draws from its own bag: a shuffled permutation of the seven kinds, consumed
//! from the front and reshuffled when empty. Every kind therefore appears exactly once per
//! bag before any kind repeats.
//!
//! Also provides a simple LCG so a seed reproduces a whole run.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Derive an independent generator, e.g. one per lane.
    pub fn fork(&mut self) -> Self {
        Self::new(self.next_u32() ^ 0x9E37_79B9)
    }
}

/// 7-bag piece queue for one lane
#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: [PieceKind; 7],
    /// Index of the next piece in `bag`; 7 means empty.
    next: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a queue with a freshly shuffled bag
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }

    pub fn with_rng(rng: SimpleRng) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            next: 0,
            rng,
        };
        queue.refill();
        queue
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.next = 0;
    }

    /// Pop the front of the bag, regenerating it first if it is empty
    pub fn draw(&mut self) -> PieceKind {
        if self.next >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.next];
        self.next += 1;
        kind
    }
}

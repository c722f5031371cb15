use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Session RNG. Seed 0 draws fresh OS entropy; any other value is fully
/// reproducible across runs.
pub fn session_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_os_rng()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

/// Sampling without replacement over `0..size`: a shuffled index list
/// consumed back to front, refilled and reshuffled once exhausted. Keeps
/// per-variant frequencies near-equal while limiting predictability.
#[derive(Debug, Clone)]
pub struct Bag {
    size: usize,
    queue: Vec<usize>,
}

impl Bag {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            queue: Vec::with_capacity(size),
        }
    }

    pub fn draw(&mut self, rng: &mut impl Rng) -> usize {
        if self.queue.is_empty() {
            self.queue.extend(0..self.size);
            self.queue.shuffle(rng);
        }
        // Non-empty here: size is validated non-zero at planning time.
        self.queue.pop().unwrap_or(0)
    }
}

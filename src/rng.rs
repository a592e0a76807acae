//! Reseedable Lehmer-style integer generator
//!
//! Every tile draw reseeds the generator from a spatial key first, so the
//! stream itself never carries state from one tile to the next. The exact
//! wrapping arithmetic below decides every tile in the world; changing any
//! constant or fold changes the whole map.

const INCREMENT: u64 = 0xE120_FC15;
const MULTIPLIER_1: u64 = 0x4A39_B70D;
const MULTIPLIER_2: u64 = 0x12FA_D5C9;

/// Small deterministic generator with a single 64-bit seed.
///
/// Not shared between threads: each worker owns its own instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lehmer {
    seed: u64,
}

impl Lehmer {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Replace the seed. Callers reseed before every independent draw.
    pub fn reseed(&mut self, key: u64) {
        self.seed = key;
    }

    /// Current seed value
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw an integer in `[min, max]`.
    ///
    /// A degenerate range (`max < min`) returns 0 and leaves the seed alone.
    pub fn next(&mut self, min: i32, max: i32) -> i32 {
        let span = max as i64 - min as i64 + 1;
        if span <= 0 {
            return 0;
        }

        self.seed = self.seed.wrapping_add(INCREMENT);
        let t1 = self.seed.wrapping_mul(MULTIPLIER_1);
        let folded = ((t1 >> 32) ^ t1) as u32;
        let t2 = (folded as u64).wrapping_mul(MULTIPLIER_2);
        // Second fold keeps the high half in place
        let r = (t2 >> 32) ^ t2;

        ((r % span as u64) as i64 + min as i64) as i32
    }
}

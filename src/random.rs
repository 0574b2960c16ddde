//! Deterministic Random Source
//!
//! Multiply-with-carry generator. The output stream for a given seed is part
//! of the public contract: changing any arithmetic here changes every image.

const W_SEED: u32 = 123_456_789;
const Z_SEED: u32 = 987_654_321;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Seedable PRNG with two 32-bit registers.
///
/// One instance belongs to one generator; it is not shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Random {
    m_w: u32,
    m_z: u32,
}

impl Random {
    pub fn new() -> Self {
        Self { m_w: W_SEED, m_z: Z_SEED }
    }

    /// Create a generator already seeded with `i`
    pub fn seeded(i: i64) -> Self {
        let mut random = Self::new();
        random.seed(i);
        random
    }

    /// Reset both registers from `i`. Any integer works; values wrap modulo 2^32.
    pub fn seed(&mut self, i: i64) {
        self.m_w = (W_SEED as i64).wrapping_add(i) as u32;
        self.m_z = (Z_SEED as i64).wrapping_sub(i) as u32;
    }

    /// Advance the state and return the raw 32-bit output
    pub fn next_u32(&mut self) -> u32 {
        self.m_z = 36969u32
            .wrapping_mul(self.m_z & 0xFFFF)
            .wrapping_add(self.m_z >> 16);
        self.m_w = 18000u32
            .wrapping_mul(self.m_w & 0xFFFF)
            .wrapping_add(self.m_w >> 16);
        (self.m_z << 16).wrapping_add(self.m_w & 0xFFFF)
    }

    /// Return a value in [0, 1)
    pub fn random(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Draw one item uniformly. Empty slices return `None` without consuming a draw.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.random() * items.len() as f64).floor() as usize;
        items.get(index)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

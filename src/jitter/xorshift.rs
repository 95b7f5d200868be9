/// Fixed lane values restored by [`JitterStream::reset`].
pub const RESET_STATE: [u32; 4] = [123_456_789, 362_436_069, 521_288_629, 88_675_123];

/// Seed written into the `w` lane before every shredder frame.
///
/// Distinct from the `w` reset constant (`88_675_123`); both values are part of the
/// reproducible sequence.
pub const SHRED_SEED: u32 = 123_456_789;

/// Deterministic xorshift128 generator (Marsaglia) over four wrapping `u32` lanes.
///
/// `reset()` followed by `set_seed(s)` and `n` calls to [`JitterStream::next_f64`] is a
/// pure function of `(s, n)`. This is a visual jitter source only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JitterStream {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl JitterStream {
    pub fn new() -> Self {
        let [x, y, z, w] = RESET_STATE;
        Self { x, y, z, w }
    }

    /// Convenience for the `reset(); set_seed(seed)` sequence every frame starts with.
    pub fn seeded(seed: u32) -> Self {
        let mut s = Self::new();
        s.set_seed(seed);
        s
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Overwrite the `w` lane only. `x`, `y` and `z` keep whatever they held.
    pub fn set_seed(&mut self, seed: u32) {
        self.w = seed;
    }

    pub fn state(&self) -> [u32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn next_u32(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = (self.w ^ (self.w >> 19)) ^ (t ^ (t >> 8));
        self.w
    }

    /// Next sample in `[0, 1)` with six decimal digits of resolution.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32() % 1_000_000) / 1_000_000.0
    }
}

impl Default for JitterStream {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/jitter/xorshift.rs"]
mod tests;

/// Xorshift32. Deterministic per seed so sessions can be replayed from their
/// recorded inputs.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    /// Draw in `0..bound`. An empty range yields `None` and leaves the state
    /// where it was.
    pub fn next_below(&mut self, bound: u32) -> Option<u32> {
        if bound == 0 {
            return None;
        }
        self.next().checked_rem(bound)
    }

    /// Uniform index in `min..=max`. `None` when the range is inverted or
    /// wider than a single draw can cover.
    pub fn next_between(&mut self, min: usize, max: usize) -> Option<usize> {
        let span = max.checked_sub(min)?.checked_add(1)?;
        let span = u32::try_from(span).ok()?;
        let offset = self.next_below(span)?;
        Some(min + offset as usize)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.next() as f64 / (u32::MAX as f64 + 1.0)
    }

    pub fn next_range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_unit()
    }
}

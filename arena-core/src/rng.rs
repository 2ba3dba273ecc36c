//! Xorshift32 generator owned by the policy context.
//!
//! Every lane and bonus draw of a session is a pure function of the seed,
//! so recorded scenarios replay to identical routes.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    /// Seeds from the host's 64-bit seed after clamping it into `i32`.
    pub fn from_host_seed(seed: i64) -> Self {
        Self::new(clamp_seed(seed) as u32)
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

    pub fn next_int(&mut self, max: u32) -> u32 {
        self.next() % max
    }

    /// Fair coin flip.
    pub fn next_bool(&mut self) -> bool {
        self.next_int(2) >= 1
    }
}

pub fn clamp_seed(seed: i64) -> i32 {
    seed.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

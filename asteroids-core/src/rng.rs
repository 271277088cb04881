use crate::constants::TAU;

/// xorshift32 stream shared by every random decision in a simulation.
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

    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next() % max
    }

    pub fn next_range(&mut self, min: i32, max_exclusive: i32) -> i32 {
        if max_exclusive <= min {
            return min;
        }
        let span = (max_exclusive - min) as u32;
        min + self.next_int(span) as i32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits fit exactly in an f32 mantissa.
        (self.next() >> 8) as f32 / (1u32 << 24) as f32
    }

    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    pub fn angle(&mut self) -> f32 {
        self.range_f32(0.0, TAU)
    }

    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    pub fn sign(&mut self) -> f32 {
        if (self.next() & 1) == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_remapped() {
        assert_eq!(SeededRng::new(0).state(), 0xDEAD_BEEF);
    }

    #[test]
    fn float_helpers_stay_in_range() {
        let mut rng = SeededRng::new(0x1234_5678);
        for _ in 0..10_000 {
            let unit = rng.next_f32();
            assert!((0.0..1.0).contains(&unit));

            let ranged = rng.range_f32(-3.0, 7.0);
            assert!((-3.0..7.0).contains(&ranged));

            let int = rng.next_range(8, 13);
            assert!((8..13).contains(&int));
        }
    }

    #[test]
    fn degenerate_ranges_do_not_panic() {
        let mut rng = SeededRng::new(7);
        assert_eq!(rng.next_int(0), 0);
        assert_eq!(rng.next_range(5, 5), 5);
        assert_eq!(rng.range_f32(2.0, 2.0), 2.0);
    }

    #[test]
    fn chance_respects_its_bounds() {
        let mut rng = SeededRng::new(0xC4A2_CE00);
        let hits = (0..10_000).filter(|_| rng.chance(0.5)).count();
        assert!((4_500..5_500).contains(&hits), "hits = {hits}");
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new(99);
        let mut b = SeededRng::new(99);
        for _ in 0..64 {
            assert_eq!(a.next(), b.next());
        }
    }
}

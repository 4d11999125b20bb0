use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Rate-based Monte-Carlo acceptance with per-template counters.
///
/// A candidate with rate `r` is accepted when a uniform draw `u` from `[0, 1)`
/// satisfies `u < frequency * r`. The product is not clamped, so values of
/// one or more always accept and zero never does.
#[derive(Debug, Clone)]
pub struct AcceptanceEngine<R = StdRng> {
    frequency: f64,
    rng: R,
    attempted: Vec<usize>,
    accepted: Vec<usize>,
}

impl AcceptanceEngine<StdRng> {
    /// Creates an engine for `templates` templates seeded with `seed`; a seed
    /// of 0 draws one from the operating system.
    pub fn seeded(frequency: f64, templates: usize, seed: u64) -> Self {
        let seed = if seed == 0 { rand::random::<u64>() } else { seed };
        info!(seed, "seeded random number generator");
        Self::new(frequency, templates, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AcceptanceEngine<R> {
    pub fn new(frequency: f64, templates: usize, rng: R) -> Self {
        Self {
            frequency,
            rng,
            attempted: vec![0; templates],
            accepted: vec![0; templates],
        }
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Zeroes the per-template counters at the start of a cycle.
    pub fn reset_counts(&mut self) {
        self.attempted.iter_mut().for_each(|c| *c = 0);
        self.accepted.iter_mut().for_each(|c| *c = 0);
    }

    pub fn record_attempt(&mut self, template: usize) {
        if let Some(count) = self.attempted.get_mut(template) {
            *count += 1;
        }
    }

    /// Draws once and decides whether a candidate of `template` with
    /// instantaneous `rate` reacts, counting the acceptance.
    pub fn accept(&mut self, template: usize, rate: f64) -> bool {
        let u: f64 = self.rng.r#gen();
        let accepted = u < self.frequency * rate;
        if accepted {
            if let Some(count) = self.accepted.get_mut(template) {
                *count += 1;
            }
        }
        accepted
    }

    pub fn attempted(&self) -> &[usize] {
        &self.attempted
    }

    pub fn accepted(&self) -> &[usize] {
        &self.accepted
    }

    pub fn total_accepted(&self) -> usize {
        self.accepted.iter().sum()
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{CollisionChecker, Configuration, FreeSampler};

const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Rejection sampler drawing uniformly within the environment limits.
pub struct UniformSampler<R = StdRng> {
    rng: R,
    max_attempts: usize,
}

impl UniformSampler<StdRng> {
    /// Creates a sampler with a reproducible sequence of draws
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> UniformSampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Draws a configuration within the limits, ignoring collisions
    pub fn sample<C: CollisionChecker + ?Sized>(&mut self, checker: &C) -> Configuration {
        checker
            .environment_limits()
            .iter()
            .map(|limit| {
                if limit.high > limit.low {
                    self.rng.gen_range(limit.low..=limit.high)
                } else {
                    limit.low
                }
            })
            .collect()
    }
}

impl<R: Rng> FreeSampler for UniformSampler<R> {
    fn sample_free<C: CollisionChecker + ?Sized>(&mut self, checker: &C) -> Option<Configuration> {
        (0..self.max_attempts)
            .map(|_| self.sample(checker))
            .find(|pos| !checker.point_in_collision(pos))
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

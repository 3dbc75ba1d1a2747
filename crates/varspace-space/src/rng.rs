//! Seeding of configuration samplers.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::SeedableRng;
use siphasher::sip::SipHasher13;

/// Generator for a single seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Per-sample generators derived from one master seed.
///
/// The seed of sample `n` is SipHash-1-3 (zero keys) over
/// `(master, n)`, so a batch can be extended without changing the samples
/// already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleSeeds {
    master: u64,
}

impl SampleSeeds {
    /// Seeds derived from `master`.
    pub fn new(master: u64) -> Self {
        Self { master }
    }

    /// Master seed.
    pub fn master(&self) -> u64 {
        self.master
    }

    /// Seed of sample `sample`.
    pub fn seed_for(&self, sample: u64) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(0, 0);
        hasher.write_u64(self.master);
        hasher.write_u64(sample);
        hasher.finish()
    }

    /// Generator of sample `sample`.
    pub fn rng_for(&self, sample: u64) -> StdRng {
        seeded_rng(self.seed_for(sample))
    }

    /// Generators for samples `0..count`.
    pub fn rngs(self, count: usize) -> impl Iterator<Item = StdRng> {
        (0..count as u64).map(move |sample| self.rng_for(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn sample_seeds_depend_on_index_only() {
        let seeds = SampleSeeds::new(11);
        assert_ne!(seeds.seed_for(0), seeds.seed_for(1));
        assert_eq!(seeds.seed_for(3), SampleSeeds::new(11).seed_for(3));
        let from_batch: Vec<u64> = seeds.rngs(4).map(|mut rng| rng.next_u64()).collect();
        assert_eq!(from_batch[2], seeds.rng_for(2).next_u64());
    }
}

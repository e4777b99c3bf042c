use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Seed carried by a freshly constructed run configuration.
///
/// Matches the default seed of the engine's Mersenne Twister so that a run
/// configured without an explicit seed reproduces the engine's own default.
pub const DEFAULT_SEED: u32 = 5489;

/// Produces one seed per call, either from OS entropy or from a deterministic
/// substream of a master seed.
///
/// Derived substreams hash `(master_seed, index)` with SipHash-1-3 under fixed
/// zero keys, so the n-th seed of a master is stable across platforms.
#[derive(Debug, Clone)]
pub struct SeedGenerator {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Entropy(StdRng),
    Derived { master: u64, next: u64 },
}

impl SeedGenerator {
    /// Seeds drawn from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            source: Source::Entropy(StdRng::from_entropy()),
        }
    }

    /// Seeds derived deterministically from `master`, one substream per call.
    pub fn derived(master: u64) -> Self {
        Self {
            source: Source::Derived { master, next: 0 },
        }
    }

    /// Returns the next seed.
    pub fn next_seed(&mut self) -> u32 {
        match &mut self.source {
            Source::Entropy(rng) => rng.next_u32(),
            Source::Derived { master, next } => {
                let seed = derive_substream_seed(*master, *next);
                *next += 1;
                // Engine seeds are 32 bits wide; fold the halves together.
                ((seed >> 32) ^ (seed & 0xffff_ffff)) as u32
            }
        }
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

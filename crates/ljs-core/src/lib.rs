#![deny(missing_docs)]
#![doc = "Shared error taxonomy and seed helpers for Lennard-Jones parameter sweeps."]

/// Structured error types shared across the sweep crates.
pub mod errors;
/// Seed sources for simulation runs.
pub mod rng;

pub use errors::{ErrorInfo, SweepError};
pub use rng::{derive_substream_seed, SeedGenerator, DEFAULT_SEED};

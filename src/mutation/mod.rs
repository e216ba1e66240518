//! Mutation Module
//!
//! The pure text-mutation core: weighted defect selection, the token
//! pool, and the single-edit flawed copy. No habitat state; both the
//! replicator and the standalone harness drive the same engine.

pub mod engine;
pub mod tokens;

pub use engine::{apply_defect, flawed_copy, weighted_choice, Defect, MutationWeights};
pub use tokens::TokenPool;

/// Seconds since the epoch, fractional. The default seed for both
/// binaries when `--seed` is not given.
pub fn time_seed() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

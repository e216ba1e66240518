//! Error Types
//!
//! Typed failures for the replicator core. Recoverable pool outcomes
//! (insufficient food, lock timeout) are ordinary values on the arbiter
//! API, not errors; everything here is either fatal at construction or
//! absorbed at a tick boundary by the caller.

use thiserror::Error;

/// Failures of the mutation primitives.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MutationError {
    /// The weight vector sums to zero or contains a negative weight.
    #[error("invalid mutation weights: sum must be positive")]
    InvalidWeights,

    /// An indexed edit (overwrite/insert/delete) was requested against an
    /// empty source. `flawed_copy` never does this; direct callers must not
    /// either.
    #[error("indexed edit requested against an empty source")]
    EmptySource,
}

/// Failures parsing a genome payload.
#[derive(Error, Debug)]
pub enum GenomeError {
    /// A known key carries a value that does not parse as its type.
    #[error("genome line {line}: bad value for `{key}`: {value:?}")]
    BadValue {
        line: usize,
        key: String,
        value: String,
    },

    /// A parsed parameter is outside its viable range.
    #[error("genome parameter `{key}` out of range: {value}")]
    OutOfRange { key: String, value: String },
}

/// Fatal configuration failures, checked before any side effect.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The lineage identity is deeper than the configured maximum. This is
    /// the guard against unbounded fork growth.
    #[error("lineage {identity:?} has generation {generation}, exceeding the maximum depth {max}")]
    GenerationTooDeep {
        identity: String,
        generation: u32,
        max: u32,
    },
}

/// Failures while producing or launching a child.
///
/// Surfaced only to the caller of `reproduce()`; the parent's lifecycle
/// continues regardless.
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("failed to write brood artifact {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch child process: {0}")]
    Launch(#[source] std::io::Error),

    #[error("could not resolve the host executable: {0}")]
    Host(#[source] std::io::Error),

    #[error("mutation failed: {0}")]
    Mutation(#[from] MutationError),

    #[error("spawn ledger: {0}")]
    Ledger(#[from] rusqlite::Error),
}

/// Non-recoverable I/O failures inside the food pool. Contention and
/// insufficient balance are NOT errors; see `EatOutcome`/`FarmOutcome`.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("food pool i/o: {0}")]
    Io(#[from] std::io::Error),
}

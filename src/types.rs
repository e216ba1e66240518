//! Germline - Type Definitions
//!
//! Shared types for the replicator runtime: lifecycle states, resource
//! outcomes, and the seams between a creature and its habitat.

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, SpawnError};
use crate::replication::lineage::Lineage;

// ─── Lifecycle ───────────────────────────────────────────────────

/// Why a creature stopped living.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    OldAge,
    Hunger,
}

impl DeathReason {
    /// Suffix appended to the genome artifact when the creature dies.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::OldAge => "old_age",
            DeathReason::Hunger => "hunger",
        }
    }
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A creature is alive until its first fatal tick. Death is terminal;
/// a halted creature stays `Alive`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureState {
    Alive,
    Dead(DeathReason),
}

// ─── Resource Outcomes ───────────────────────────────────────────

/// Result of an attempted withdrawal from the shared food pool.
///
/// Shortfalls and lock timeouts are ordinary outcomes here, not errors:
/// a hungry creature that finds the pool empty just stays hungry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EatOutcome {
    /// The full amount was withdrawn.
    Consumed,
    /// The pool held less than the requested amount; nothing was taken.
    Insufficient,
    /// The pool lock could not be acquired within the deadline.
    TimedOut,
}

impl EatOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EatOutcome::Consumed => "consumed",
            EatOutcome::Insufficient => "insufficient",
            EatOutcome::TimedOut => "timed_out",
        }
    }
}

/// Result of an attempted deposit into the shared food pool.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FarmOutcome {
    /// The deposit landed (or seeded a missing pool).
    Deposited,
    /// The pool lock could not be acquired within the deadline.
    TimedOut,
}

impl FarmOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmOutcome::Deposited => "deposited",
            FarmOutcome::TimedOut => "timed_out",
        }
    }
}

// ─── Habitat Seams ───────────────────────────────────────────────

/// Mediates access to the shared food counter.
///
/// Implementations must hold cross-process mutual exclusion across each
/// read-modify-write cycle and release it on every path. Waits are
/// bounded: a blocked creature walks away with `TimedOut` rather than
/// stalling its tick forever.
pub trait ResourceArbiter {
    /// Withdraw `amount` units, all or nothing.
    fn eat(&self, amount: u64) -> Result<EatOutcome, PoolError>;

    /// Deposit `amount` units. The pool has no upper bound.
    fn farm(&self, amount: u64) -> Result<FarmOutcome, PoolError>;
}

/// Produces offspring on behalf of a living creature.
pub trait Spawner {
    /// Whether replication is administratively enabled for this run.
    /// When disabled the whole reproduction attempt is a no-op.
    fn enabled(&self) -> bool;

    /// Mutate the parent's genome, persist the child artifact, launch the
    /// child process detached, and record the spawn. Failures are the
    /// caller's to absorb; they never end the parent's lifecycle.
    fn spawn(&mut self, child: &Lineage, rng: &mut StdRng) -> Result<SpawnRecord, SpawnError>;
}

// ─── Spawn Records ───────────────────────────────────────────────

/// One row of the append-only spawn ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnRecord {
    pub id: String,
    pub parent: String,
    pub child: String,
    pub generation: u32,
    pub artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    pub spawned_at: String,
}

// ─── Logging ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

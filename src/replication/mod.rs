//! Replication Module
//!
//! Everything between a parent and its offspring: lineage identities,
//! the founding genome, the hatchery that writes and launches mutated
//! copies, and the append-only ledger that remembers every spawn.

pub mod genesis;
pub mod ledger;
pub mod lineage;
pub mod spawn;

pub use genesis::starter_genome;
pub use ledger::SpawnLedger;
pub use lineage::Lineage;
pub use spawn::{Hatchery, HatcheryOptions};

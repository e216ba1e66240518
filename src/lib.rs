//! Germline -- Self-Replicating Creature Runtime
//!
//! A creature that lives in a shared habitat, farms and eats from a
//! common food pool, and reproduces by launching mutated copies of its
//! own genome as independent processes.

pub mod types;
pub mod config;
pub mod error;
pub mod genome;
pub mod harness;
pub mod lifecycle;
pub mod mutation;
pub mod pool;
pub mod replication;
pub mod telemetry;

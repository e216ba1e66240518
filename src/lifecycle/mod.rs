//! Lifecycle Module
//!
//! The per-process creature state machine and its cooperative
//! cancellation. One process is one creature; it ages tick by tick
//! until it dies, finishes its requested ticks, or is halted.

pub mod cancel;
pub mod creature;

pub use cancel::{watch_halt_file, CancelToken};
pub use creature::{Creature, CreatureOptions};

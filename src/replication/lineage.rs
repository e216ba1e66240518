//! Lineage
//!
//! Dotted lineage identities. A creature's name is the path from its
//! progenitor down to itself: the third child of `1.0` is `1.0.2`.
//! Generation is the segment count, and the generation of a name is
//! what the depth guard checks at construction.

use std::fmt;

use super::ledger::SpawnLedger;

/// A creature's position in its family tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lineage(String);

impl Lineage {
    pub fn new(id: impl Into<String>) -> Self {
        Lineage(id.into())
    }

    /// Number of dotted segments. The progenitor's empty name still
    /// counts as one segment, so generations start at 1.
    pub fn generation(&self) -> u32 {
        self.0.split('.').count() as u32
    }

    /// Name for the `nth` offspring (zero-based).
    pub fn child(&self, nth: u32) -> Lineage {
        Lineage(format!("{}.{}", self.0, nth))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Lineage {
    fn from(id: &str) -> Self {
        Lineage::new(id)
    }
}

/// Human-readable summary of the habitat's spawn history, for `--lineage`.
pub fn brood_summary(ledger: &SpawnLedger) -> Result<String, rusqlite::Error> {
    let total = ledger.spawn_count()?;
    if total == 0 {
        return Ok("No spawns recorded (first generation, or replication disabled)".to_string());
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("Spawns recorded: {total}"));
    for (parent, count) in ledger.summary()? {
        let name = if parent.is_empty() {
            "<progenitor>"
        } else {
            parent.as_str()
        };
        parts.push(format!("  {name}: {count} offspring"));
    }
    parts.push("Recent:".to_string());
    for record in ledger.recent(10)? {
        parts.push(format!(
            "  {} -> {} (gen {}, pid {}) at {}",
            if record.parent.is_empty() {
                "<progenitor>"
            } else {
                record.parent.as_str()
            },
            record.child,
            record.generation,
            record.pid.map_or("?".to_string(), |pid| pid.to_string()),
            record.spawned_at,
        ));
    }
    Ok(parts.join("\n"))
}

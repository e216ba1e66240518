//! Spawn
//!
//! Hatch child creatures. The parent copies its own genome text with
//! one defect, writes the copy into the brood directory under a fresh
//! generation-tagged name, launches a new process on it fully detached,
//! and appends the spawn to the ledger. There is no channel back: once
//! launched, a child is on its own.

use std::fs;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::Utc;
use rand::rngs::StdRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SpawnError;
use crate::mutation::{flawed_copy, MutationWeights, TokenPool};
use crate::types::{SpawnRecord, Spawner};

use super::ledger::SpawnLedger;
use super::lineage::Lineage;

/// Everything a hatchery needs to produce offspring.
pub struct HatcheryOptions {
    pub enabled: bool,
    pub parent: Lineage,
    pub habitat: PathBuf,
    pub brood_dir: PathBuf,
    pub ledger_path: PathBuf,
    /// The parent's raw genome text; the bequest is textual, not a
    /// re-render of the parsed form.
    pub genome_text: String,
    pub weights: MutationWeights,
    pub use_keywords: bool,
    /// Forwarded to children unchanged so descendants cannot outrun the
    /// depth guard.
    pub max_depth: u32,
}

/// The real [`Spawner`]: mutate, persist, launch, record.
pub struct Hatchery {
    enabled: bool,
    parent: Lineage,
    habitat: PathBuf,
    brood_dir: PathBuf,
    ledger_path: PathBuf,
    genome_text: String,
    weights: MutationWeights,
    tokens: TokenPool,
    use_keywords: bool,
    max_depth: u32,
    // Opened on first spawn so a disabled or childless run never
    // creates the ledger file.
    ledger: Option<SpawnLedger>,
}

impl Hatchery {
    pub fn new(options: HatcheryOptions) -> Self {
        Hatchery {
            enabled: options.enabled,
            parent: options.parent,
            habitat: options.habitat,
            brood_dir: options.brood_dir,
            ledger_path: options.ledger_path,
            genome_text: options.genome_text,
            weights: options.weights,
            tokens: TokenPool::standard(options.use_keywords),
            use_keywords: options.use_keywords,
            max_depth: options.max_depth,
            ledger: None,
        }
    }

    /// Write the mutated genome under a fresh unique name in the brood
    /// directory, creating it if needed.
    fn write_artifact(&self, child: &Lineage, genome: &str) -> Result<PathBuf, SpawnError> {
        fs::create_dir_all(&self.brood_dir).map_err(|source| SpawnError::Artifact {
            path: self.brood_dir.display().to_string(),
            source,
        })?;
        let uuid = Uuid::new_v4().simple().to_string();
        let path = self
            .brood_dir
            .join(format!("creature-{}-{}.genome", child, &uuid[..8]));
        fs::write(&path, genome).map_err(|source| SpawnError::Artifact {
            path: path.display().to_string(),
            source,
        })?;
        debug!(artifact = %path.display(), "wrote child genome");
        Ok(path)
    }

    /// Launch the host binary on the child's artifact, detached: own
    /// process group, null stdio, no handle kept. The parent's exit must
    /// never take the child down with it.
    fn launch(&self, child: &Lineage, artifact: &Path) -> Result<u32, SpawnError> {
        let host = std::env::current_exe().map_err(SpawnError::Host)?;
        let mut command = Command::new(host);
        command
            .arg("--id")
            .arg(child.as_str())
            .arg("--maxgen")
            .arg(self.max_depth.to_string())
            .arg("--genome")
            .arg(artifact)
            .arg("--habitat")
            .arg(&self.habitat)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir(&self.habitat)
            .process_group(0);
        if !self.use_keywords {
            command.arg("--no-keywords");
        }
        let offspring = command.spawn().map_err(SpawnError::Launch)?;
        Ok(offspring.id())
    }

    fn ledger(&mut self) -> Result<&SpawnLedger, SpawnError> {
        if self.ledger.is_none() {
            self.ledger = Some(SpawnLedger::open(&self.ledger_path)?);
        }
        match &self.ledger {
            Some(ledger) => Ok(ledger),
            None => unreachable!(),
        }
    }
}

impl Spawner for Hatchery {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn spawn(&mut self, child: &Lineage, rng: &mut StdRng) -> Result<SpawnRecord, SpawnError> {
        let mutated = flawed_copy(&self.genome_text, &self.weights, &self.tokens, rng)?;
        let artifact = self.write_artifact(child, &mutated)?;
        let pid = self.launch(child, &artifact)?;

        let record = SpawnRecord {
            id: Uuid::new_v4().to_string(),
            parent: self.parent.to_string(),
            child: child.to_string(),
            generation: child.generation(),
            artifact: artifact.display().to_string(),
            pid: Some(pid),
            spawned_at: Utc::now().to_rfc3339(),
        };
        self.ledger()?.append(&record)?;

        info!(child = %child, pid, artifact = %record.artifact, "spawned offspring");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn hatchery_in(dir: &Path) -> Hatchery {
        Hatchery::new(HatcheryOptions {
            enabled: true,
            parent: Lineage::new("1"),
            habitat: dir.to_path_buf(),
            brood_dir: dir.join("brood"),
            ledger_path: dir.join("ledger.db"),
            genome_text: "max_age = 100\n".to_string(),
            weights: MutationWeights::default(),
            use_keywords: true,
            max_depth: 3,
        })
    }

    #[test]
    fn test_artifact_name_carries_the_child_lineage() {
        let dir = tempdir().unwrap();
        let hatchery = hatchery_in(dir.path());
        let child = Lineage::new("1.0");
        let path = hatchery.write_artifact(&child, "max_age = 10\n").unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("creature-1.0-"));
        assert!(name.ends_with(".genome"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "max_age = 10\n");
    }

    #[test]
    fn test_artifacts_get_unique_names() {
        let dir = tempdir().unwrap();
        let hatchery = hatchery_in(dir.path());
        let child = Lineage::new("1.0");
        let first = hatchery.write_artifact(&child, "a").unwrap();
        let second = hatchery.write_artifact(&child, "b").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_construction_touches_nothing_on_disk() {
        let dir = tempdir().unwrap();
        let _hatchery = hatchery_in(dir.path());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_mutated_copy_differs_by_at_most_one_edit() {
        let dir = tempdir().unwrap();
        let hatchery = hatchery_in(dir.path());
        let mut rng = StdRng::seed_from_u64(11);
        let source = hatchery.genome_text.clone();
        for _ in 0..100 {
            let copy = flawed_copy(&source, &hatchery.weights, &hatchery.tokens, &mut rng).unwrap();
            let delta = copy.chars().count() as i64 - source.chars().count() as i64;
            // Keywords can add whole words; deletions remove one unit.
            assert!((-1..=21).contains(&delta), "delta {delta}");
        }
    }

    #[test]
    fn test_unwritable_brood_dir_is_a_spawn_error() {
        let dir = tempdir().unwrap();
        // A file where the brood directory should be.
        fs::write(dir.path().join("brood"), "in the way").unwrap();
        let hatchery = hatchery_in(dir.path());
        let err = hatchery
            .write_artifact(&Lineage::new("1.0"), "x")
            .unwrap_err();
        assert!(matches!(err, SpawnError::Artifact { .. }));
    }
}

//! Harness
//!
//! The standalone mutation-testing loop behind the `mutator` binary.
//! It copies a target file, applies one defect per round, and lets an
//! external verifier vote: candidates that pass become the new accepted
//! content, candidates that fail are reverted. One process, one loop,
//! nothing touched outside the target's directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::mutation::{flawed_copy, MutationWeights, TokenPool};

pub struct HarnessOptions {
    pub target: PathBuf,
    pub mutations: u32,
    pub seed: f64,
    /// Shell command handed the candidate path as its final argument.
    /// Exit status zero accepts the candidate. `None` accepts everything.
    pub check: Option<String>,
    pub use_keywords: bool,
}

#[derive(Debug)]
pub struct HarnessReport {
    pub accepted: u32,
    pub rejected: u32,
    /// The working copy holding the last accepted content.
    pub survivor: PathBuf,
}

/// Run the accept/revert loop. The target file itself is never written;
/// all candidates land in `mutated_<name>` beside it, and that file holds
/// the surviving content when the loop finishes.
pub fn run(options: HarnessOptions) -> Result<HarnessReport> {
    let mut accepted_text = fs::read_to_string(&options.target)
        .with_context(|| format!("reading target {}", options.target.display()))?;
    let name = options
        .target
        .file_name()
        .with_context(|| format!("target {} has no file name", options.target.display()))?
        .to_string_lossy()
        .into_owned();
    let survivor = options.target.with_file_name(format!("mutated_{name}"));

    let mut rng = StdRng::seed_from_u64(options.seed.to_bits());
    let weights = MutationWeights::default();
    let pool = TokenPool::standard(options.use_keywords);

    fs::write(&survivor, &accepted_text)
        .with_context(|| format!("writing {}", survivor.display()))?;

    let mut accepted = 0u32;
    let mut rejected = 0u32;

    for round in 1..=options.mutations {
        let candidate = flawed_copy(&accepted_text, &weights, &pool, &mut rng)?;
        debug!(round, bytes = candidate.len(), "candidate written");
        fs::write(&survivor, &candidate)
            .with_context(|| format!("writing {}", survivor.display()))?;

        if verify(options.check.as_deref(), &survivor)? {
            accepted += 1;
            accepted_text = candidate;
            println!(
                "{}",
                format!("round {round}/{}: accepted", options.mutations).green()
            );
        } else {
            rejected += 1;
            println!(
                "{}",
                format!("round {round}/{}: rejected, reverting", options.mutations).red()
            );
            fs::write(&survivor, &accepted_text)
                .with_context(|| format!("writing {}", survivor.display()))?;
            if !verify(options.check.as_deref(), &survivor)? {
                bail!("reverted survivor failed verification; the baseline itself does not pass");
            }
        }
    }

    println!(
        "{}",
        format!(
            "{accepted} accepted, {rejected} rejected, survivor at {}",
            survivor.display()
        )
        .bold()
    );
    Ok(HarnessReport {
        accepted,
        rejected,
        survivor,
    })
}

fn verify(check: Option<&str>, candidate: &Path) -> Result<bool> {
    let Some(check) = check else {
        return Ok(true);
    };
    // The candidate path rides as "$1" so the shell never word-splits it.
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{check} \"$1\""))
        .arg("sh")
        .arg(candidate)
        .status()
        .with_context(|| format!("running verifier `{check}`"))?;
    debug!(check, passed = status.success(), "verifier finished");
    Ok(status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options(target: PathBuf, mutations: u32, check: Option<String>) -> HarnessOptions {
        HarnessOptions {
            target,
            mutations,
            seed: 0.1234,
            check,
            use_keywords: false,
        }
    }

    #[test]
    fn test_no_verifier_accepts_everything() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("creature.txt");
        fs::write(&target, "some creature content").unwrap();

        let report = run(options(target.clone(), 5, None)).unwrap();
        assert_eq!(report.accepted, 5);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.survivor, dir.path().join("mutated_creature.txt"));
        assert!(report.survivor.exists());
        assert!(target.exists());
    }

    #[test]
    fn test_zero_rounds_still_writes_the_survivor() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("creature.txt");
        fs::write(&target, "untouched").unwrap();

        let report = run(options(target, 0, None)).unwrap();
        assert_eq!(report.accepted, 0);
        assert_eq!(report.rejected, 0);
        assert_eq!(fs::read_to_string(report.survivor).unwrap(), "untouched");
    }

    #[test]
    fn test_passing_verifier_accepts() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("creature.txt");
        fs::write(&target, "anything goes").unwrap();

        let report = run(options(target, 3, Some("true".to_string()))).unwrap();
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn test_verifier_survives_spaces_in_the_path() {
        let dir = tempdir().unwrap();
        let nest = dir.path().join("deep space");
        fs::create_dir(&nest).unwrap();
        let target = nest.join("creature.txt");
        fs::write(&target, "anything goes").unwrap();

        let report = run(options(target, 3, Some("test -f".to_string()))).unwrap();
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.survivor, nest.join("mutated_creature.txt"));
    }

    #[test]
    fn test_failing_baseline_is_fatal() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("creature.txt");
        fs::write(&target, "never good enough").unwrap();

        let err = run(options(target, 3, Some("false".to_string()))).unwrap_err();
        assert!(err.to_string().contains("does not pass"));
    }

    #[test]
    fn test_strict_verifier_keeps_the_baseline() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("creature.txt");
        // No token in the pool appears in this content, so no single
        // edit can reproduce it and the comparison rejects every round.
        fs::write(&target, "@@@@").unwrap();

        let check = format!("cmp -s {}", target.display());
        let report = run(options(target.clone(), 4, Some(check))).unwrap();
        assert_eq!(report.accepted, 0);
        assert_eq!(report.rejected, 4);
        assert_eq!(fs::read_to_string(report.survivor).unwrap(), "@@@@");
    }

    #[test]
    fn test_same_seed_same_survivor() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        fs::write(&first, "identical starting point").unwrap();
        fs::write(&second, "identical starting point").unwrap();

        let one = run(options(first, 10, None)).unwrap();
        let two = run(options(second, 10, None)).unwrap();
        assert_eq!(
            fs::read_to_string(one.survivor).unwrap(),
            fs::read_to_string(two.survivor).unwrap()
        );
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let dir = tempdir().unwrap();
        let err = run(options(dir.path().join("ghost.txt"), 1, None)).unwrap_err();
        assert!(err.to_string().contains("reading target"));
    }
}

//! Food Pool
//!
//! The shared food counter: a decimal number in a plain text file,
//! guarded by an advisory lock on a sibling lock file so creatures in
//! separate processes serialize their read-modify-write cycles. Lock
//! waits are bounded; a creature that cannot get the lock in time walks
//! away with a timeout outcome instead of stalling its tick.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::debug;

use crate::config::Settings;
use crate::error::PoolError;
use crate::types::{EatOutcome, FarmOutcome, ResourceArbiter};

/// Balance assumed when the counter file is missing or unreadable.
/// Mutation can corrupt anything, the food counter included.
const DEFAULT_BALANCE: i64 = 10;

/// File-backed [`ResourceArbiter`].
pub struct FilePool {
    food_path: PathBuf,
    lock_path: PathBuf,
    eat_timeout: Duration,
    farm_timeout: Duration,
    poll: Duration,
}

/// Exclusive hold on the pool; releases on drop on every path.
struct PoolGuard(File);

impl Drop for PoolGuard {
    fn drop(&mut self) {
        let _ = self.0.unlock();
    }
}

impl FilePool {
    /// Describe the pool without touching the filesystem; files appear
    /// lazily on first use.
    pub fn new(habitat: &Path, settings: &Settings) -> Self {
        FilePool {
            food_path: habitat.join(&settings.food_file),
            lock_path: habitat.join(&settings.lock_file),
            eat_timeout: Duration::from_millis(settings.eat_lock_timeout_ms),
            farm_timeout: Duration::from_millis(settings.farm_lock_timeout_ms),
            poll: Duration::from_millis(settings.lock_poll_ms),
        }
    }

    /// Poll for the advisory lock until `timeout` runs out. `None` means
    /// the deadline passed with the lock still held elsewhere.
    fn acquire(&self, timeout: Duration) -> Result<Option<PoolGuard>, PoolError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)?;
        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Some(PoolGuard(file))),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    thread::sleep(self.poll);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Current balance, defaulting when the file is missing or garbled.
    fn read_balance(&self) -> i64 {
        match fs::read_to_string(&self.food_path) {
            Ok(text) => text.trim().parse().unwrap_or(DEFAULT_BALANCE),
            Err(_) => DEFAULT_BALANCE,
        }
    }

    fn write_balance(&self, balance: i64) -> Result<(), PoolError> {
        fs::write(&self.food_path, balance.to_string())?;
        Ok(())
    }
}

impl ResourceArbiter for FilePool {
    fn eat(&self, amount: u64) -> Result<EatOutcome, PoolError> {
        let Some(_guard) = self.acquire(self.eat_timeout)? else {
            return Ok(EatOutcome::TimedOut);
        };
        let balance = self.read_balance();
        let remaining = balance - amount as i64;
        if remaining < 0 {
            debug!(balance, amount, "pool too shallow to eat from");
            return Ok(EatOutcome::Insufficient);
        }
        self.write_balance(remaining)?;
        Ok(EatOutcome::Consumed)
    }

    fn farm(&self, amount: u64) -> Result<FarmOutcome, PoolError> {
        let Some(_guard) = self.acquire(self.farm_timeout)? else {
            return Ok(FarmOutcome::TimedOut);
        };
        if !self.food_path.exists() {
            // The first farmer seeds a missing pool at the default; that
            // tick's crop is not added on top.
            self.write_balance(DEFAULT_BALANCE)?;
            return Ok(FarmOutcome::Deposited);
        }
        let balance = self.read_balance();
        self.write_balance(balance + amount as i64)?;
        Ok(FarmOutcome::Deposited)
    }
}

//! Cancellation
//!
//! Cooperative shutdown. Signal handlers and the halt-file watcher set
//! a shared flag; the lifecycle checks it between ticks and never
//! mid-tick, so a halted creature is left intact, not half-dead.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

/// Cloneable cancellation flag shared between the lifecycle and
/// whatever decides to stop it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Watch for the habitat's halt file and cancel when it appears. The
/// task also winds down quietly if something else cancels first.
pub fn watch_halt_file(path: PathBuf, poll: Duration, token: CancelToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if token.is_cancelled() {
                return;
            }
            if path.exists() {
                info!(path = %path.display(), "halt file present, stopping");
                token.cancel();
                return;
            }
            tokio::time::sleep(poll).await;
        }
    })
}

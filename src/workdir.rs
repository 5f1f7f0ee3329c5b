use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Switches the process working directory for as long as the guard lives.
///
/// The previous directory is restored on drop, which covers early returns,
/// `?` propagation and panic unwinding alike.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
}

impl WorkdirGuard {
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir.as_ref())?;
        debug!(dir = %dir.as_ref().display(), "entered directory");
        Ok(WorkdirGuard { previous })
    }

    /// Directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(dir = %self.previous.display(), error = %e, "failed to restore working directory");
        }
    }
}

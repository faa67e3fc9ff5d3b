//! Platform state file handling for the tools.
//!
//! Each tool run loads the simulated platform from its JSON state file,
//! works on it, and writes it back. The state is saved even when the run
//! failed, so changes applied before the failure are kept.

use crate::error::ToolResult;
use nfm_api::sim::SimPlatform;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A loaded platform tied to the file it came from.
#[derive(Debug)]
pub struct PlatformFile {
    path: PathBuf,
    platform: SimPlatform,
}

impl PlatformFile {
    /// Loads the platform, starting fresh if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> ToolResult<Self> {
        let path = path.into();
        let platform = SimPlatform::load(&path)?;
        debug!("Platform state loaded from {}", path.display());
        Ok(Self { path, platform })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A handle sharing state with this file's platform.
    pub fn platform(&self) -> SimPlatform {
        self.platform.clone()
    }

    /// Writes the current state back to the file.
    pub fn save(&self) -> ToolResult<()> {
        self.platform.save(&self.path)?;
        debug!("Platform state saved to {}", self.path.display());
        Ok(())
    }

    /// Saves the state and passes `outcome` through.
    ///
    /// A save failure replaces a successful outcome; after a failed run it
    /// is only logged, so the original error is what gets reported.
    pub fn finish<T>(&self, outcome: ToolResult<T>) -> ToolResult<T> {
        match (self.save(), outcome) {
            (Ok(()), outcome) => outcome,
            (Err(save_err), Ok(_)) => Err(save_err),
            (Err(save_err), Err(run_err)) => {
                error!("{}", save_err);
                Err(run_err)
            }
        }
    }
}

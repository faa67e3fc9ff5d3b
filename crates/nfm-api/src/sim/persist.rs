//! JSON persistence of [`PlatformState`].
//!
//! The command line tools run one action sequence per process, so the
//! simulated platform is loaded from and saved to a state file around each
//! run.

use super::{PlatformState, SimPlatform};
use nfm_types::MAX_DEVICES;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors reading or writing a platform state file.
#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("failed to read platform state {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write platform state {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed platform state {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid platform state {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl SimPlatform {
    /// Loads a platform from `path`, or a fresh one if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, StateFileError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No platform state at {}, starting empty", path.display());
                return Ok(SimPlatform::new());
            }
            Err(source) => {
                return Err(StateFileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut state: PlatformState =
            serde_json::from_str(&text).map_err(|source| StateFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if state.devices.len() > MAX_DEVICES {
            return Err(StateFileError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "{} devices listed, at most {} supported",
                    state.devices.len(),
                    MAX_DEVICES
                ),
            });
        }
        // Devices missing from the file are treated as not installed.
        state.devices.resize_with(MAX_DEVICES, || super::DeviceState {
            present: false,
            ..Default::default()
        });

        debug!("Loaded platform state from {}", path.display());
        Ok(SimPlatform::from_state(state))
    }

    /// Writes the current state to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StateFileError> {
        let text = serde_json::to_string_pretty(&self.state()).map_err(|source| {
            StateFileError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, text).map_err(|source| StateFileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved platform state to {}", path.display());
        Ok(())
    }
}

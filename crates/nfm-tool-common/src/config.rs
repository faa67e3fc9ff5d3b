//! Tool configuration.
//!
//! The configuration is read from a TOML file named by `--config`, or by
//! the `NFM_TOOLS_CONFIG` environment variable when no flag is given.
//! Without either, built-in defaults apply. Every field is optional:
//!
//! ```toml
//! platform_state = "/var/run/nfm/platform.json"
//! rules_queue = "/sample_external_ports"
//! search_devices = [0, 1]
//! log_level = "info"
//! ```

use crate::error::{ToolError, ToolResult};
use nfm_types::DeviceId;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NFM_TOOLS_CONFIG";

/// Default location of the simulated platform state.
pub const DEFAULT_PLATFORM_STATE: &str = "nfm-platform.json";

/// Rules queue scanned by `nfm-get-ports`.
pub const DEFAULT_RULES_QUEUE: &str = "/sample_external_ports";

/// Shared configuration of the NFM tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// JSON file holding the simulated platform state.
    pub platform_state: PathBuf,
    /// Name of the rules queue to open.
    pub rules_queue: String,
    /// Devices searched by `nfm-get-ports` when none are given.
    pub search_devices: Vec<DeviceId>,
    /// Default log level, overridden by `-l` and `RUST_LOG`.
    pub log_level: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            platform_state: PathBuf::from(DEFAULT_PLATFORM_STATE),
            rules_queue: DEFAULT_RULES_QUEUE.to_string(),
            search_devices: vec![DeviceId::default(), DeviceId::new(1).unwrap_or_default()],
            log_level: "info".to_string(),
        }
    }
}

impl ToolConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads a configuration file. The file must exist.
    pub fn load(path: &Path) -> ToolResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ToolError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text).map_err(|e| ToolError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("Loaded tool configuration from {}", path.display());
        Ok(config)
    }

    /// Resolves the configuration from an explicit path, then the
    /// environment, then the defaults.
    pub fn resolve(explicit: Option<&Path>) -> ToolResult<Self> {
        Self::resolve_with(explicit, std::env::var_os(CONFIG_ENV))
    }

    fn resolve_with(explicit: Option<&Path>, env_value: Option<OsString>) -> ToolResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match env_value {
            Some(value) if !value.is_empty() => Self::load(Path::new(&value)),
            _ => Ok(Self::default()),
        }
    }
}

//! Error types for the NFM tools.
//!
//! Input errors ([`ToolError::InvalidFormat`], [`ToolError::OutOfRange`],
//! [`ToolError::Usage`]) are detected before any device call. All other
//! variants wrap the [`NfmError`] reported by the platform and name the
//! action that failed, so the one-line diagnostic shows both.

use nfm_api::sim::StateFileError;
use nfm_api::NfmError;
use nfm_types::{DeviceId, ParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors reported by the NFM tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Malformed number, list or argument.
    #[error("Invalid format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    /// A number outside the range the hardware supports.
    #[error("Invalid {what} ({value}) specified, valid values are 0-{max}")]
    OutOfRange {
        what: String,
        value: String,
        max: u64,
    },

    /// Load-balance group store call failed.
    #[error("Error {action} on NFE {device}: {source}")]
    Device {
        /// What was being done, e.g. "setting load balance group 3".
        action: String,
        device: DeviceId,
        #[source]
        source: NfmError,
    },

    /// A forwarding configuration step failed.
    #[error("Error 0x{:08x} during {stage}: {source}", .source.raw())]
    Config {
        stage: String,
        #[source]
        source: NfmError,
    },

    /// The forwarding configuration subsystem could not be opened.
    #[error("Error 0x{:08x} opening forwarding configuration subsystem: {source}", .source.raw())]
    SubsystemUnavailable {
        #[source]
        source: NfmError,
    },

    /// Reading a rule failed part way through a scan.
    #[error("Rule read failed on NFE {device}: {source}")]
    RuleRead {
        device: DeviceId,
        #[source]
        source: NfmError,
    },

    /// The rule table could not be opened.
    #[error("Rules setup failed on NFE {device} ({action}): {source}")]
    Setup {
        device: DeviceId,
        action: String,
        #[source]
        source: NfmError,
    },

    /// Invalid combination of command line options.
    #[error("{message}")]
    Usage { message: String },

    /// Tool configuration file could not be used.
    #[error("Configuration file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    /// Platform state file could not be used.
    #[error(transparent)]
    State(#[from] StateFileError),

    /// Writing tool output failed.
    #[error("Error writing output: {0}")]
    Output(#[from] std::io::Error),
}

impl ToolError {
    pub fn device(action: impl Into<String>, device: DeviceId, source: NfmError) -> Self {
        Self::Device {
            action: action.into(),
            device,
            source,
        }
    }

    pub fn config(stage: impl Into<String>, source: NfmError) -> Self {
        Self::Config {
            stage: stage.into(),
            source,
        }
    }

    pub fn setup(device: DeviceId, action: impl Into<String>, source: NfmError) -> Self {
        Self::Setup {
            device,
            action: action.into(),
            source,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn invalid_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors detected locally, before any device I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidFormat { .. } | ToolError::OutOfRange { .. } | ToolError::Usage { .. }
        )
    }

    /// The platform error behind this failure, if any.
    pub fn nfm_error(&self) -> Option<&NfmError> {
        match self {
            ToolError::Device { source, .. }
            | ToolError::Config { source, .. }
            | ToolError::SubsystemUnavailable { source }
            | ToolError::RuleRead { source, .. }
            | ToolError::Setup { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for ToolError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidFormat { input, reason } => ToolError::InvalidFormat {
                input,
                reason: reason.to_string(),
            },
            ParseError::OutOfRange { what, value, max } => ToolError::OutOfRange {
                what: what.to_string(),
                value,
                max,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfm_api::NfmStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_error_conversion() {
        let err: ToolError = nfm_types::HostDestId::new(40).unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "Invalid destination ID (40) specified, valid values are 0-31"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_device_error_display() {
        let err = ToolError::device(
            "setting load balance group 1 to destinations 0x7",
            DeviceId::new(0).unwrap(),
            NfmError::from_status(NfmStatus::HardwareFault, 2),
        );
        assert_eq!(
            err.to_string(),
            "Error setting load balance group 1 to destinations 0x7 on NFE 0: \
             NS_NFM_HARDWARE_FAULT (subcode 2): hardware fault"
        );
        assert!(!err.is_input_error());
        assert_eq!(err.nfm_error().map(|e| e.subcode()), Some(2));
    }

    #[test]
    fn test_config_error_shows_raw_code() {
        let err = ToolError::config(
            "commit",
            NfmError::from_status(NfmStatus::TableFull, 1),
        );
        assert_eq!(
            err.to_string(),
            "Error 0x000d0001 during commit: NS_NFM_TABLE_FULL (subcode 1): table full"
        );
    }

    #[test]
    fn test_usage_is_input_error() {
        assert!(ToolError::usage("No interfaces specified").is_input_error());
        assert!(ToolError::usage("x").nfm_error().is_none());
    }
}

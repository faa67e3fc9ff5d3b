//! Common infrastructure for the NFM command line tools.
//!
//! This crate provides functionality shared by `nfm-lb`, `nfm-get-ports`
//! and `nfm-configure-forwarding`:
//!
//! - [`error`]: the user-facing error taxonomy
//! - [`logging`]: tracing subscriber setup and log level parsing
//! - [`config`]: the TOML tool configuration
//! - [`state`]: loading and saving the platform state file
//!
//! # Example
//!
//! ```ignore
//! use nfm_tool_common::{config::ToolConfig, logging, ToolResult};
//!
//! fn main() -> ToolResult<()> {
//!     let config = ToolConfig::resolve(None)?;
//!     logging::init(&config.log_level);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod state;

pub use config::ToolConfig;
pub use error::{ToolError, ToolResult};
pub use state::PlatformFile;

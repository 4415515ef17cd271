//! Configuration for the health tracker (`~/.config/health-tracker/config.toml`).
//!
//! Precedence, lowest first: built-in defaults, the config file, environment
//! variables, then command-line flags. The result is one immutable
//! [`TrackerConfig`] per invocation.

pub mod config;
pub mod paths;
pub mod validate;

pub use config::{CliOverrides, ConfigFile, EnvOverrides, TrackerConfig};
pub use paths::{DataMode, config_path, default_data_dir};
pub use validate::validate_config_file;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// XDG application name for config and data directories.
pub const APP_NAME: &str = "health-tracker";

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "TRACKER_CONFIG";

/// Which data set an invocation reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Production,
    Test,
}

impl DataMode {
    pub fn from_test_flag(test_mode: bool) -> Self {
        if test_mode { Self::Test } else { Self::Production }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Path to the config file: `$TRACKER_CONFIG`, else `~/.config/health-tracker/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let dirs = project_dirs().context("Failed to determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Default data directory: `<XDG data>/health-tracker/data/{production|test}`.
pub fn default_data_dir(mode: DataMode) -> Result<PathBuf> {
    let dirs = project_dirs().context("Failed to determine data directory")?;
    Ok(dirs.data_dir().join("data").join(mode.dir_name()))
}

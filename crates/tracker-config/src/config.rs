use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracker_validate::rules::{Bounds, ChangeRule, MAX_NOTE_LENGTH, RuleTable};

use crate::paths::{DataMode, config_path, default_data_dir};
use crate::validate::validate_config_file;

pub const DATA_DIR_ENV: &str = "TRACKER_DATA_DIR";
pub const TEST_MODE_ENV: &str = "TRACKER_TEST_MODE";

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub validation: ValidationSection,
    #[serde(default)]
    pub rules: RulesSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSection {
    #[serde(default)]
    pub allow_future_dates: bool,
    #[serde(default = "default_max_note_length")]
    pub max_note_length: usize,
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            allow_future_dates: false,
            max_note_length: MAX_NOTE_LENGTH,
        }
    }
}

fn default_max_note_length() -> usize {
    MAX_NOTE_LENGTH
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesSection {
    #[serde(default)]
    pub weight: WeightRules,
    #[serde(default)]
    pub exercise: ExerciseRules,
}

/// Overrides for the weight rule. Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightRules {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub max_change: Option<f64>,
}

/// Overrides for the exercise duration bounds, in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseRules {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ConfigFile {
    /// Load and validate the file at `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let file: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        validate_config_file(&file)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(file)
    }

    /// Commented template written by `tracker config init`.
    pub fn default_template() -> String {
        format!(
            r#"# Health Tracker Configuration
# Location: ~/.config/health-tracker/config.toml
#
# Environment variables TRACKER_DATA_DIR and TRACKER_TEST_MODE override
# this file; command-line flags override both.

[storage]
# data_dir = "/path/to/data"  # Default: <XDG data dir>/health-tracker/data/<mode>

[validation]
allow_future_dates = false
max_note_length = {MAX_NOTE_LENGTH}

[rules.weight]
# min = 75.0
# max = 250.0
# max_change = 10.0  # Pounds between entries before a warning

[rules.exercise]
# min = 1
# max = 480
"#
        )
    }
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub data_dir: Option<PathBuf>,
    pub test_mode: Option<bool>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: lookup(DATA_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            test_mode: lookup(TEST_MODE_ENV).and_then(|v| parse_bool(&v)),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        other => {
            tracing::warn!(value = other, "ignoring unrecognised boolean in {TEST_MODE_ENV}");
            None
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub test_mode: bool,
    pub allow_future: bool,
}

/// Effective configuration for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub data_dir: PathBuf,
    pub mode: DataMode,
    pub allow_future_dates: bool,
    pub rules: RuleTable,
    /// Config file the values were read from, if it existed.
    pub source: Option<PathBuf>,
}

impl TrackerConfig {
    /// Resolve from the default config location and the real environment.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        let path = config_path()?;
        let file = ConfigFile::load_from(&path)?;
        let source = path.exists().then_some(path);
        let mut config = Self::resolve(file, &EnvOverrides::from_env(), cli)?;
        config.source = source;
        Ok(config)
    }

    /// Layer defaults, file, environment, then CLI.
    pub fn resolve(file: ConfigFile, env: &EnvOverrides, cli: &CliOverrides) -> Result<Self> {
        let test_mode = cli.test_mode || env.test_mode.unwrap_or(false);
        let mode = DataMode::from_test_flag(test_mode);

        // An explicit directory is used as-is; only the default is split by mode.
        let data_dir = match cli
            .data_dir
            .clone()
            .or_else(|| env.data_dir.clone())
            .or_else(|| file.storage.data_dir.clone())
        {
            Some(dir) => dir,
            None => default_data_dir(mode)?,
        };

        let rules = build_rules(&file);
        tracing::debug!(
            data_dir = %data_dir.display(),
            mode = mode.dir_name(),
            "resolved configuration"
        );

        Ok(Self {
            data_dir,
            mode,
            allow_future_dates: cli.allow_future || file.validation.allow_future_dates,
            rules,
            source: None,
        })
    }

    pub fn is_test_mode(&self) -> bool {
        self.mode == DataMode::Test
    }
}

fn build_rules(file: &ConfigFile) -> RuleTable {
    let mut rules = RuleTable::builtin().with_max_note_length(file.validation.max_note_length);

    let weight = &file.rules.weight;
    if let Some(bounds) = rules.weight.bounds.as_mut() {
        override_bounds(bounds, weight.min, weight.max);
    }
    if let (Some(max_delta), ChangeRule::Absolute { .. }) = (weight.max_change, rules.weight.change) {
        rules.weight.change = ChangeRule::Absolute { max_delta };
    }

    let exercise = &file.rules.exercise;
    if let Some(bounds) = rules.exercise.bounds.as_mut() {
        override_bounds(bounds, exercise.min, exercise.max);
    }
    rules
}

fn override_bounds(bounds: &mut Bounds, min: Option<f64>, max: Option<f64>) {
    if let Some(min) = min {
        bounds.min = min;
    }
    if let Some(max) = max {
        bounds.max = max;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use tracker_config::{ConfigFile, TrackerConfig, config_path};
use tracker_validate::{Bounds, ChangeRule, RuleTable};

use crate::cli::ConfigCommands;
use crate::result::CommandResult;

/// Serializable view of the effective configuration.
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    source: Option<PathBuf>,
    data_dir: PathBuf,
    mode: &'static str,
    allow_future_dates: bool,
    max_note_length: usize,
    weight: WeightView,
    exercise: BoundsView,
}

#[derive(Debug, Serialize)]
struct WeightView {
    min: f64,
    max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_change: Option<f64>,
}

#[derive(Debug, Serialize)]
struct BoundsView {
    min: f64,
    max: f64,
}

impl EffectiveConfig {
    fn from_config(config: &TrackerConfig) -> Self {
        let rules: &RuleTable = &config.rules;
        let (weight_min, weight_max) = bounds_pair(rules.weight.bounds);
        let (exercise_min, exercise_max) = bounds_pair(rules.exercise.bounds);
        Self {
            source: config.source.clone(),
            data_dir: config.data_dir.clone(),
            mode: config.mode.dir_name(),
            allow_future_dates: config.allow_future_dates,
            max_note_length: rules.weight.max_note_length,
            weight: WeightView {
                min: weight_min,
                max: weight_max,
                max_change: match rules.weight.change {
                    ChangeRule::Absolute { max_delta } => Some(max_delta),
                    ChangeRule::Ratio { .. } | ChangeRule::None => None,
                },
            },
            exercise: BoundsView {
                min: exercise_min,
                max: exercise_max,
            },
        }
    }
}

fn bounds_pair(bounds: Option<Bounds>) -> (f64, f64) {
    bounds.map_or((0.0, 0.0), |b| (b.min, b.max))
}

pub(crate) fn handle(cmd: ConfigCommands, config: Result<TrackerConfig>) -> Result<CommandResult> {
    match cmd {
        ConfigCommands::Show => handle_show(&config?),
        ConfigCommands::Init => handle_init(&config_path()?),
        ConfigCommands::Path => {
            let path = config_path()?;
            Ok(CommandResult::completed(path.display().to_string())
                .with_data(&serde_json::json!({ "path": path, "exists": path.exists() })))
        }
    }
}

fn handle_show(config: &TrackerConfig) -> Result<CommandResult> {
    let view = EffectiveConfig::from_config(config);
    let rendered = toml::to_string_pretty(&view).context("Failed to render configuration")?;
    let message = match &config.source {
        Some(path) => format!("Configuration from {}", path.display()),
        None => "Built-in configuration (no config file)".to_string(),
    };
    Ok(CommandResult::completed(message)
        .with_data(&view)
        .with_details(rendered.lines().map(str::to_string).collect()))
}

/// Write the commented template unless a config file already exists.
fn handle_init(path: &Path) -> Result<CommandResult> {
    if path.exists() {
        return Ok(CommandResult::completed(format!(
            "Config file already exists at {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    std::fs::write(path, ConfigFile::default_template())
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote config template");
    Ok(CommandResult::completed(format!(
        "Generated config template at {}",
        path.display()
    )))
}

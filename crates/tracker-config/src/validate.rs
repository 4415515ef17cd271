use anyhow::{Result, bail};

use crate::config::ConfigFile;

/// Reject config values the validation engine cannot work with.
pub fn validate_config_file(file: &ConfigFile) -> Result<()> {
    if file.validation.max_note_length == 0 {
        bail!("validation.max_note_length must be > 0");
    }

    let weight = &file.rules.weight;
    validate_bounds("rules.weight", weight.min, weight.max, 75.0, 250.0)?;
    if let Some(max_change) = weight.max_change {
        if !(max_change.is_finite() && max_change > 0.0) {
            bail!("rules.weight.max_change must be > 0 (got {max_change})");
        }
    }

    let exercise = &file.rules.exercise;
    validate_bounds("rules.exercise", exercise.min, exercise.max, 1.0, 480.0)?;
    if let Some(min) = exercise.min {
        if min <= 0.0 {
            bail!("rules.exercise.min must be > 0 (got {min})");
        }
    }

    if let Some(dir) = &file.storage.data_dir {
        if dir.as_os_str().is_empty() {
            bail!("storage.data_dir cannot be empty");
        }
    }
    Ok(())
}

/// `min < max` after filling unset sides with the built-in values.
fn validate_bounds(
    section: &str,
    min: Option<f64>,
    max: Option<f64>,
    default_min: f64,
    default_max: f64,
) -> Result<()> {
    for (name, value) in [("min", min), ("max", max)] {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                bail!("{section}.{name} must be a non-negative number (got {value})");
            }
        }
    }
    let min = min.unwrap_or(default_min);
    let max = max.unwrap_or(default_max);
    if min >= max {
        bail!("{section}.min ({min}) must be less than {section}.max ({max})");
    }
    Ok(())
}

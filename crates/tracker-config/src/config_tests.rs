use super::*;
use serial_test::serial;
use std::collections::HashMap;
use tempfile::tempdir;
use tracker_validate::rules::ChangeRule;

fn env_from(pairs: &[(&str, &str)]) -> EnvOverrides {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvOverrides::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_parse_full_file() {
    let toml_str = r#"
[storage]
data_dir = "/srv/health"

[validation]
allow_future_dates = true
max_note_length = 200

[rules.weight]
min = 90.0
max = 300.0
max_change = 5.0

[rules.exercise]
max = 600
"#;
    let file: ConfigFile = toml::from_str(toml_str).unwrap();
    assert_eq!(file.storage.data_dir, Some(PathBuf::from("/srv/health")));
    assert!(file.validation.allow_future_dates);
    assert_eq!(file.validation.max_note_length, 200);
    assert_eq!(file.rules.weight.max_change, Some(5.0));
    assert_eq!(file.rules.exercise.max, Some(600.0));
    assert_eq!(file.rules.exercise.min, None);
}

#[test]
fn test_empty_file_uses_defaults() {
    let file: ConfigFile = toml::from_str("").unwrap();
    assert_eq!(file, ConfigFile::default());
    assert_eq!(file.validation.max_note_length, MAX_NOTE_LENGTH);
}

#[test]
fn test_unknown_keys_rejected() {
    let result: Result<ConfigFile, _> = toml::from_str("[storage]\ndatadir = \"/x\"\n");
    assert!(result.is_err());
}

#[test]
fn test_default_template_parses() {
    let file: ConfigFile = toml::from_str(&ConfigFile::default_template()).unwrap();
    assert_eq!(file, ConfigFile::default());
}

#[test]
fn test_load_from_missing_file() {
    let dir = tempdir().unwrap();
    let file = ConfigFile::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(file, ConfigFile::default());
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[rules.weight]\nmin = 200.0\nmax = 100.0\n").unwrap();

    let err = ConfigFile::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("rules.weight.min"));
}

#[test]
fn test_rules_apply_file_overrides() {
    let mut file = ConfigFile::default();
    file.rules.weight.min = Some(90.0);
    file.rules.weight.max_change = Some(5.0);
    file.rules.exercise.max = Some(600.0);
    file.validation.max_note_length = 100;

    let config = TrackerConfig::resolve(
        file,
        &EnvOverrides::default(),
        &CliOverrides {
            data_dir: Some(PathBuf::from("/tmp/data")),
            ..Default::default()
        },
    )
    .unwrap();

    let weight = &config.rules.weight;
    assert_eq!(weight.bounds.unwrap().min, 90.0);
    assert_eq!(weight.bounds.unwrap().max, 250.0);
    assert_eq!(weight.change, ChangeRule::Absolute { max_delta: 5.0 });
    assert_eq!(config.rules.exercise.bounds.unwrap().max, 600.0);
    assert_eq!(config.rules.soda.max_note_length, 100);
}

#[test]
fn test_data_dir_precedence() {
    let mut file = ConfigFile::default();
    file.storage.data_dir = Some(PathBuf::from("/from/file"));

    let from_file =
        TrackerConfig::resolve(file.clone(), &EnvOverrides::default(), &CliOverrides::default())
            .unwrap();
    assert_eq!(from_file.data_dir, PathBuf::from("/from/file"));

    let env = env_from(&[("TRACKER_DATA_DIR", "/from/env")]);
    let from_env = TrackerConfig::resolve(file.clone(), &env, &CliOverrides::default()).unwrap();
    assert_eq!(from_env.data_dir, PathBuf::from("/from/env"));

    let cli = CliOverrides {
        data_dir: Some(PathBuf::from("/from/cli")),
        ..Default::default()
    };
    let from_cli = TrackerConfig::resolve(file, &env, &cli).unwrap();
    assert_eq!(from_cli.data_dir, PathBuf::from("/from/cli"));
}

#[test]
fn test_test_mode_selects_test_directory() {
    let env = env_from(&[("TRACKER_TEST_MODE", "true")]);
    let config =
        TrackerConfig::resolve(ConfigFile::default(), &env, &CliOverrides::default()).unwrap();
    assert!(config.is_test_mode());
    assert!(config.data_dir.ends_with("data/test"));

    let config = TrackerConfig::resolve(
        ConfigFile::default(),
        &EnvOverrides::default(),
        &CliOverrides::default(),
    )
    .unwrap();
    assert!(!config.is_test_mode());
    assert!(config.data_dir.ends_with("data/production"));
}

#[test]
fn test_env_bool_parsing() {
    assert_eq!(env_from(&[("TRACKER_TEST_MODE", "1")]).test_mode, Some(true));
    assert_eq!(env_from(&[("TRACKER_TEST_MODE", "off")]).test_mode, Some(false));
    assert_eq!(env_from(&[("TRACKER_TEST_MODE", "maybe")]).test_mode, None);
    assert_eq!(env_from(&[("TRACKER_DATA_DIR", "  ")]).data_dir, None);
}

#[test]
fn test_allow_future_from_file_or_cli() {
    let mut file = ConfigFile::default();
    let cli = CliOverrides {
        data_dir: Some(PathBuf::from("/tmp/data")),
        ..Default::default()
    };
    let config = TrackerConfig::resolve(file.clone(), &EnvOverrides::default(), &cli).unwrap();
    assert!(!config.allow_future_dates);

    file.validation.allow_future_dates = true;
    let config = TrackerConfig::resolve(file, &EnvOverrides::default(), &cli).unwrap();
    assert!(config.allow_future_dates);

    let cli = CliOverrides {
        allow_future: true,
        ..cli
    };
    let config =
        TrackerConfig::resolve(ConfigFile::default(), &EnvOverrides::default(), &cli).unwrap();
    assert!(config.allow_future_dates);
}

#[test]
#[serial]
fn test_env_overrides_read_process_environment() {
    let original = std::env::var_os(DATA_DIR_ENV);
    // SAFETY: test-scoped env mutation, serialized with #[serial].
    unsafe { std::env::set_var(DATA_DIR_ENV, "/tmp/tracker-env-test") };
    let env = EnvOverrides::from_env();
    // SAFETY: restore the original value before other serial tests run.
    unsafe {
        match original {
            Some(value) => std::env::set_var(DATA_DIR_ENV, value),
            None => std::env::remove_var(DATA_DIR_ENV),
        }
    }
    assert_eq!(env.data_dir, Some(PathBuf::from("/tmp/tracker-env-test")));
}

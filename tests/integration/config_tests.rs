use dupecat::actions::DeleteMode;
use dupecat::config::{Config, ConfigError};
use dupecat::search::SearchMode;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config.display_limit, 100);
    assert_eq!(config.search_min_length, 15);
    assert_eq!(config.search_mode, SearchMode::Fuzzy);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
sample_size = 4096
display_limit = 20
search_mode = "fast"
delete_mode = "trash"
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.sample_size, 4096);
    assert_eq!(config.display_limit, 20);
    assert_eq!(config.search_mode, SearchMode::Exact);
    assert_eq!(config.delete_mode, DeleteMode::Trash);
    // Untouched keys keep their defaults
    assert_eq!(config.search_min_length, 15);
}

#[test]
fn test_explicit_file_overrides_platform_file() {
    let temp_dir = tempdir().unwrap();
    let platform = temp_dir.path().join("platform.toml");
    let explicit = temp_dir.path().join("explicit.toml");
    fs::write(&platform, "display_limit = 10\nsearch_min_length = 5\n").unwrap();
    fs::write(&explicit, "display_limit = 30\n").unwrap();

    let config: Config = Config::figment(Some(platform.as_path()), Some(explicit.as_path()))
        .extract()
        .unwrap();

    assert_eq!(config.display_limit, 30);
    assert_eq!(config.search_min_length, 5);
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DUPECAT_TEST_SEARCH_MIN_LENGTH", "25");
    std::env::set_var("DUPECAT_TEST_SEARCH_MODE", "exact");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPECAT_TEST_"))
        .extract()
        .unwrap();

    assert_eq!(config.search_min_length, 25);
    assert_eq!(config.search_mode, SearchMode::Exact);

    std::env::remove_var("DUPECAT_TEST_SEARCH_MIN_LENGTH");
    std::env::remove_var("DUPECAT_TEST_SEARCH_MODE");
}

#[test]
fn test_config_invalid_toml_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "invalid = toml").unwrap();

    let result = Config::load(Some(config_path.as_path()));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_wrong_type_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "display_limit = \"lots\"\n").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(result.is_err());
}

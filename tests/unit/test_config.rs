use mapdoc::core::config::{MapdocConfig, DEFAULT_CONFIG_FILE};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_without_config_file_uses_defaults() {
    // The crate root carries no mapdoc.toml, so the implicit lookup
    // falls through to the built-in defaults.
    assert_eq!(DEFAULT_CONFIG_FILE, "mapdoc.toml");

    let config = MapdocConfig::load(None).unwrap();
    assert_eq!(config.api.model, "gpt-4o");
    assert_eq!(config.output.dir, PathBuf::from("output"));
    assert_eq!(config.generate.chunk_size, 1000);
}

#[test]
fn test_load_explicit_file_overrides_defaults_per_field() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
[api]
model = "gpt-4o-mini"

[generate]
chunk_size = 400
"#,
    )
    .unwrap();

    let config = MapdocConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.api.model, "gpt-4o-mini");
    assert_eq!(config.generate.chunk_size, 400);
    assert_eq!(config.api.base_url, "https://models.inference.ai.azure.com");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_sections_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.toml");
    fs::write(
        &path,
        r#"
[api]
model = "gpt-4o"

[some_future_section]
knob = 7
"#,
    )
    .unwrap();

    let config = MapdocConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.api.model, "gpt-4o");
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
[generate]
chunk_size = 0
"#,
    )
    .unwrap();

    let err = MapdocConfig::load(Some(path.as_path())).unwrap_err();
    assert!(err
        .to_string()
        .contains("generate.chunk_size must be at least 1"));
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[api\nmodel = ").unwrap();

    let err = MapdocConfig::load(Some(path.as_path())).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.toml"));
}

#[test]
fn test_serialized_config_omits_unset_api_key() {
    let config = MapdocConfig::default();
    let toml = toml::to_string(&config).unwrap();

    assert!(toml.contains("base_url"));
    assert!(!toml.contains("api_key ="));

    let round_tripped: MapdocConfig = toml::from_str(&toml).unwrap();
    assert_eq!(round_tripped.api.model, config.api.model);
    assert_eq!(round_tripped.generate.chunk_size, config.generate.chunk_size);
}

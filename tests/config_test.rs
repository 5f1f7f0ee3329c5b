// tests/config_test.rs
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use release_train::config::{load_config, Config};
use release_train::registry::ComponentRegistry;
use release_train::tools::{ExternalTools, RecordingTools};
use release_train::ReleaseError;
use tempfile::NamedTempFile;

fn tools() -> Arc<dyn ExternalTools> {
    Arc::new(RecordingTools::new())
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.settings.workspace, PathBuf::from("."));
    assert_eq!(config.settings.module_prefix, "github.com/unikorn-cloud");
    assert_eq!(config.components.len(), 6);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[settings]
workspace = "/src/platform"
work_branch = "release"

[[components]]
name = "base"

[[components]]
name = "api"
dependencies = ["base"]
precommit = ["make generate"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.settings.workspace, PathBuf::from("/src/platform"));
    assert_eq!(config.settings.work_branch, "release");
    assert_eq!(config.settings.main_branch, "main");

    let registry = ComponentRegistry::from_config(&config, tools()).unwrap();
    assert_eq!(registry.names(), vec!["base", "api"]);
    let api = registry.get("api").unwrap();
    assert_eq!(api.dependencies, vec!["base"]);
    assert!(api.precommit_hook.is_some());
    assert!(registry.get("base").unwrap().precommit_hook.is_none());
}

#[test]
fn test_fixture_file() {
    let config = load_config(Some("tests/fixtures/release-train.toml"))
        .expect("Failed to load test config");
    assert_eq!(config.settings.remote, "upstream");
    assert_eq!(config.components[1].name, "identity");
}

#[test]
fn test_default_registry_from_config() {
    let registry = ComponentRegistry::from_config(&Config::default(), tools()).unwrap();
    assert_eq!(
        registry.names(),
        vec!["core", "identity", "region", "compute", "kubernetes", "ui"]
    );
    assert_eq!(
        registry.get("compute").unwrap().dependencies,
        vec!["core", "identity", "region"]
    );
    assert_eq!(
        registry.get("ui").unwrap().precommit_hook.as_ref().unwrap().name(),
        "ui-precommit"
    );
}

#[test]
fn test_out_of_order_components_rejected() {
    let config: Config = toml::from_str(
        r#"
[[components]]
name = "identity"
dependencies = ["core"]

[[components]]
name = "core"
"#,
    )
    .unwrap();

    let err = ComponentRegistry::from_config(&config, tools()).unwrap_err();
    assert!(matches!(err, ReleaseError::Config(_)));
}

#[test]
fn test_malformed_file_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[settings\nremote = 1").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, ReleaseError::Config(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_config(Some("tests/fixtures/does-not-exist.toml")).unwrap_err();
    assert!(matches!(err, ReleaseError::Io(_)));
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const CONFIG_FILE: &str = "release-train.toml";

/// Represents the complete configuration for release-train.
///
/// Contains pipeline settings and the ordered component list.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default = "default_components")]
    pub components: Vec<ComponentConfig>,
}

/// Pipeline-wide settings shared by every component.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Directory containing one checkout per component, named after it
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Branch every checkout must be on, and the one that gets tagged
    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    /// Temporary branch carrying the version bump
    #[serde(default = "default_work_branch")]
    pub work_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Module path prefix used when pinning inter-component dependencies
    #[serde(default = "default_module_prefix")]
    pub module_prefix: String,

    #[serde(default = "default_chart_glob")]
    pub chart_glob: String,

    #[serde(default = "default_openapi_glob")]
    pub openapi_glob: String,
}

/// One `[[components]]` entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ComponentConfig {
    pub name: String,

    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Command lines run, in order, before committing a full release
    #[serde(default)]
    pub precommit: Vec<String>,
}

impl ComponentConfig {
    fn new(name: &str, dependencies: &[&str]) -> Self {
        ComponentConfig {
            name: name.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            precommit: Vec::new(),
        }
    }
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_main_branch() -> String {
    "main".to_string()
}

fn default_work_branch() -> String {
    "bump".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_module_prefix() -> String {
    "github.com/unikorn-cloud".to_string()
}

fn default_chart_glob() -> String {
    "charts/**/Chart.yaml".to_string()
}

fn default_openapi_glob() -> String {
    "pkg/openapi/*.spec.yaml".to_string()
}

/// Returns the platform's component list in release order.
fn default_components() -> Vec<ComponentConfig> {
    let mut ui = ComponentConfig::new("ui", &[]);
    ui.precommit = ["identity", "region", "compute", "kubernetes"]
        .iter()
        .map(|api| format!("npm run openapi:{}", api))
        .collect();

    vec![
        ComponentConfig::new("core", &[]),
        ComponentConfig::new("identity", &["core"]),
        ComponentConfig::new("region", &["core", "identity"]),
        ComponentConfig::new("compute", &["core", "identity", "region"]),
        ComponentConfig::new("kubernetes", &["core", "identity", "region"]),
        ui,
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            workspace: default_workspace(),
            main_branch: default_main_branch(),
            work_branch: default_work_branch(),
            remote: default_remote(),
            module_prefix: default_module_prefix(),
            chart_glob: default_chart_glob(),
            openapi_glob: default_openapi_glob(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            settings: Settings::default(),
            components: default_components(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-train.toml` in current directory
/// 3. `release-train.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE).exists() {
        fs::read_to_string(CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

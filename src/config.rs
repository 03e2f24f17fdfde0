//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bomtree/bomtree.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `BOMTREE_*` prefix, `__` as nesting separator

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};

/// Names given to the first project node of a new model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub desc: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Project".into(),
            desc: "Top level node, describe the project here!".into(),
        }
    }
}

/// Raw config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawProjectConfig {
    pub name: Option<String>,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_name: Option<String>,
    pub tag_seed: Option<String>,
    pub project: RawProjectConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the invisible root component
    pub root_name: String,
    /// Tag given to the project node when retagging
    pub tag_seed: String,
    pub project: ProjectConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: "root".into(),
            tag_seed: "#000-000".into(),
            project: ProjectConfig::default(),
        }
    }
}

pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bomtree").map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bomtree.toml"))
}

fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            tag_seed: overlay
                .tag_seed
                .clone()
                .unwrap_or_else(|| self.tag_seed.clone()),
            project: ProjectConfig {
                name: overlay
                    .project
                    .name
                    .clone()
                    .unwrap_or_else(|| self.project.name.clone()),
                desc: overlay
                    .project
                    .desc
                    .clone()
                    .unwrap_or_else(|| self.project.desc.clone()),
            },
        }
    }

    /// Loads defaults, the global file, an optional local file and env overrides.
    ///
    /// A missing global file is skipped; a missing local file is an error.
    pub fn load(local: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!("loading local config {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Loads a single file over the defaults, ignoring global config and env.
    pub fn from_file(path: &Path) -> ApplicationResult<Self> {
        Ok(Self::default().merge_with(&load_raw_settings(path)?))
    }

    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BOMTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_string("tag_seed") {
            settings.tag_seed = val;
        }
        if let Ok(val) = config.get_string("project.name") {
            settings.project.name = val;
        }
        if let Ok(val) = config.get_string("project.desc") {
            settings.project.desc = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# bomtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bomtree/bomtree.toml
#   Local:  file passed with --config
#   Env:    BOMTREE_* environment variables (BOMTREE_PROJECT__NAME for nested keys)

# Name of the invisible root component
# root_name = "root"

# Tag assigned to the project node when the tree is retagged
# tag_seed = "#000-000"

[project]
# Name and description of the first project node
# name = "Project"
# desc = "Top level node, describe the project here!"
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn given_defaults_when_created_then_matches_project_seed() {
        let settings = Settings::default();
        assert_eq!(settings.root_name, "root");
        assert_eq!(settings.tag_seed, "#000-000");
        assert_eq!(settings.project.name, "Project");
        assert_eq!(
            settings.project.desc,
            "Top level node, describe the project here!"
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unset_fields() {
        let overlay = RawSettings {
            root_name: None,
            tag_seed: Some("#100-000".into()),
            project: RawProjectConfig {
                name: Some("Rover".into()),
                desc: None,
            },
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.root_name, "root");
        assert_eq!(merged.tag_seed, "#100-000");
        assert_eq!(merged.project.name, "Rover");
        assert_eq!(merged.project.desc, ProjectConfig::default().desc);
    }

    #[test]
    fn given_local_file_when_loading_then_file_values_apply() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "root_name = \"top\"\n[project]\nname = \"Drone\"").expect("write");

        let settings = Settings::from_file(file.path()).expect("load");
        assert_eq!(settings.root_name, "top");
        assert_eq!(settings.project.name, "Drone");
        assert_eq!(settings.tag_seed, "#000-000");
    }

    #[test]
    fn given_malformed_file_when_loading_then_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "root_name = [").expect("write");

        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_missing_local_file_when_loading_then_config_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn given_settings_when_to_toml_then_roundtrips_through_template_keys() {
        let toml = Settings::default().to_toml().expect("serialize");
        assert!(toml.contains("root_name = \"root\""));
        assert!(toml.contains("[project]"));
        for key in ["root_name", "tag_seed", "[project]", "name", "desc"] {
            assert!(Settings::template().contains(key), "template lacks {key}");
        }
    }
}

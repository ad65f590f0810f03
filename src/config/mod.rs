//! Project configuration (familyhub.yaml) and environment overrides
//!
//! The configuration file is optional. Every field has a default matching the
//! stock FamilyHub checkout, so a project root without `familyhub.yaml` works
//! out of the box.

use std::env;
use std::fs;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};

pub mod layout;

pub use layout::HubLayout;

/// Configuration file name, looked up at the project root
pub const CONFIG_FILE: &str = "familyhub.yaml";

/// Environment variable naming the project root
pub const ROOT_ENV: &str = "FAMILYHUB_ROOT";

/// Environment variable carrying the explicit deployment override
pub const STANDALONE_ENV: &str = "FAMILYHUB_IS_STANDALONE";

/// Project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Host portal directory, relative to the project root
    pub host_dir: String,

    /// Integration target directory inside the host portal
    pub apps_dir: String,

    /// Standalone modules directory, relative to the project root
    pub standalone_dir: String,

    /// Explicit deployment override; always wins when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_standalone: Option<bool>,

    /// Module names the serving process has loaded
    pub loaded_modules: Vec<String>,

    /// Host portal core module names
    pub core_modules: Vec<String>,

    /// Framework modules that always lead the installed-module list
    pub base_modules: Vec<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host_dir: "FamilyHub".to_string(),
            apps_dir: "apps".to_string(),
            standalone_dir: "standalone-apps".to_string(),
            is_standalone: None,
            loaded_modules: Vec::new(),
            core_modules: vec!["home".to_string()],
            base_modules: [
                "django.contrib.admin",
                "django.contrib.auth",
                "django.contrib.contenttypes",
                "django.contrib.sessions",
                "django.contrib.messages",
                "django.contrib.staticfiles",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

impl HubConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `familyhub.yaml` from the project root, without environment overrides
    pub fn load_file(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| HubError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            HubError::ConfigParseFailed { reason, .. } => HubError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Load configuration and apply environment overrides
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Self::load_file(root)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `FAMILYHUB_IS_STANDALONE` when it is set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = env::var(STANDALONE_ENV) {
            let flag = parse_bool_flag(&value).ok_or_else(|| HubError::ConfigInvalid {
                message: format!("{STANDALONE_ENV} must be a boolean, got '{value}'"),
            })?;
            self.is_standalone = Some(flag);
        }
        Ok(())
    }

    /// Resolve the filesystem layout for a project root
    pub fn layout(&self, root: &Path) -> HubLayout {
        HubLayout::new(root, &self.host_dir, &self.apps_dir, &self.standalone_dir)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("host_dir", &self.host_dir),
            ("apps_dir", &self.apps_dir),
            ("standalone_dir", &self.standalone_dir),
        ] {
            if value.trim().is_empty() {
                return Err(HubError::ConfigInvalid {
                    message: format!("{field} must not be empty"),
                });
            }
            if Path::new(value).is_absolute() {
                return Err(HubError::ConfigInvalid {
                    message: format!("{field} must be relative to the project root"),
                });
            }
            if Path::new(value)
                .components()
                .any(|c| matches!(c, Component::ParentDir))
            {
                return Err(HubError::ConfigInvalid {
                    message: format!("{field} must stay inside the project root"),
                });
            }
        }
        Ok(())
    }
}

/// Parse a boolean flag value the way environment files spell them
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

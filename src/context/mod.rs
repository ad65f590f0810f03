//! Deployment context detection
//!
//! Decides whether the current process runs a module on its own (standalone)
//! or runs inside the host portal (integrated). Rules, first match wins:
//!
//! 1. explicit flag (`is_standalone` in config or `FAMILYHUB_IS_STANDALONE`)
//! 2. a host core module is among the modules the process has loaded
//! 3. the process directory sits under the standalone or host directory name
//!
//! When nothing matches the context is `standalone` and a warning is logged.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::HubConfig;

/// Template every page extends; the context parameterizes it
pub const BASE_TEMPLATE: &str = "familyhub/base.html";

/// Where the current process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentContext {
    Standalone,
    Integrated,
}

impl DeploymentContext {
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentContext::Standalone => "standalone",
            DeploymentContext::Integrated => "integrated",
        }
    }

    pub fn is_standalone(self) -> bool {
        self == DeploymentContext::Standalone
    }

    pub fn is_integrated(self) -> bool {
        self == DeploymentContext::Integrated
    }

    /// Page chrome the base template renders: portal navigation or a bare module shell
    pub fn chrome(self) -> &'static str {
        match self {
            DeploymentContext::Standalone => "module",
            DeploymentContext::Integrated => "portal",
        }
    }
}

impl fmt::Display for DeploymentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule decided the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    ExplicitFlag,
    LoadedModules,
    ProcessPath,
    Default,
}

impl fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectionRule::ExplicitFlag => "explicit flag",
            DetectionRule::LoadedModules => "loaded modules",
            DetectionRule::ProcessPath => "process path",
            DetectionRule::Default => "default",
        };
        f.write_str(name)
    }
}

/// Result of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub context: DeploymentContext,
    pub rule: DetectionRule,
}

/// Everything detection looks at. Built once, never read from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionInputs {
    pub explicit_standalone: Option<bool>,
    pub loaded_modules: Vec<String>,
    pub core_modules: Vec<String>,
    pub process_dir: PathBuf,
    pub host_dir_name: String,
    pub standalone_dir_name: String,
}

impl DetectionInputs {
    pub fn from_config(config: &HubConfig, process_dir: &Path) -> Self {
        Self {
            explicit_standalone: config.is_standalone,
            loaded_modules: config.loaded_modules.clone(),
            core_modules: config.core_modules.clone(),
            process_dir: process_dir.to_path_buf(),
            host_dir_name: config.host_dir.clone(),
            standalone_dir_name: config.standalone_dir.clone(),
        }
    }
}

/// Run detection. Pure given its inputs.
pub fn detect(inputs: &DetectionInputs) -> Detection {
    if let Some(standalone) = inputs.explicit_standalone {
        let context = if standalone {
            DeploymentContext::Standalone
        } else {
            DeploymentContext::Integrated
        };
        return Detection {
            context,
            rule: DetectionRule::ExplicitFlag,
        };
    }

    if has_core_module(&inputs.loaded_modules, &inputs.core_modules) {
        return Detection {
            context: DeploymentContext::Integrated,
            rule: DetectionRule::LoadedModules,
        };
    }

    if let Some(context) = context_from_path(inputs) {
        return Detection {
            context,
            rule: DetectionRule::ProcessPath,
        };
    }

    tracing::warn!(
        process_dir = %inputs.process_dir.display(),
        "no deployment rule matched, assuming standalone"
    );
    Detection {
        context: DeploymentContext::Standalone,
        rule: DetectionRule::Default,
    }
}

/// Loaded names may be dotted (`home.apps.HomeConfig`); only the package counts
fn has_core_module(loaded: &[String], core: &[String]) -> bool {
    loaded.iter().any(|name| {
        let package = name.split('.').next().unwrap_or(name);
        core.iter().any(|c| c == package)
    })
}

fn context_from_path(inputs: &DetectionInputs) -> Option<DeploymentContext> {
    let has_component = |wanted: &str| {
        inputs
            .process_dir
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == wanted))
    };

    // A standalone project may live under a directory that also carries the
    // host name, so the standalone convention is checked first.
    if has_component(&inputs.standalone_dir_name) {
        Some(DeploymentContext::Standalone)
    } else if has_component(&inputs.host_dir_name) {
        Some(DeploymentContext::Integrated)
    } else {
        None
    }
}

/// Process-lifetime holder for the detected context.
///
/// The first `get_or_detect` fixes the value. Later calls return it unchanged
/// whatever inputs they pass; only `redetect` replaces it.
#[derive(Debug, Default)]
pub struct ContextCell {
    detected: OnceLock<Detection>,
}

impl ContextCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Detection> {
        self.detected.get().copied()
    }

    pub fn get_or_detect(&self, inputs: &DetectionInputs) -> Detection {
        *self.detected.get_or_init(|| {
            let detection = detect(inputs);
            tracing::debug!(
                context = %detection.context,
                rule = %detection.rule,
                "deployment context detected"
            );
            detection
        })
    }

    /// Explicitly replace the cached context. Logged with the caller's reason.
    pub fn redetect(&mut self, inputs: &DetectionInputs, reason: &str) -> Detection {
        let previous = self.get();
        let detection = detect(inputs);
        tracing::info!(
            reason,
            previous = previous.map_or("none", |d| d.context.as_str()),
            context = %detection.context,
            rule = %detection.rule,
            "deployment context re-detected"
        );
        self.detected = OnceLock::from(detection);
        detection
    }
}

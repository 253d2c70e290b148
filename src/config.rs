//! Manifest handling for Stenciler templates.
//! The manifest (`.stenciler.yaml`) is read from the template source on every
//! invocation and a fresh copy is written into the output directory on
//! success; the previous output manifest is fully superseded, never patched.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Manifest file name, both at the template-source root and the output root.
pub const MANIFEST_FILE: &str = ".stenciler.yaml";

/// Root of the manifest file: an ordered sequence of template specs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateSpec>,
}

/// One template unit: a source directory plus its parameters, glob rules and
/// hook lists. `directory` is the stable identity key across template
/// revisions. Globs are relative to `directory`; hook paths are relative to
/// the template-source root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateSpec {
    /// Present only in the output manifest: where the spec came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub directory: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_copy: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_only: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_init_hooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_init_hooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_update_hooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_update_hooks: Vec<String>,
}

/// A single named parameter and its resolution mode: either a fixed `value`
/// or an interactive `prompt` (with optional `default` and
/// `validation-hook`). A persisted spec always carries a resolved `value` and
/// retains the original `prompt` text for display on a future re-prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_hook: Option<String>,
}

impl Manifest {
    /// Parses a manifest from YAML content and validates it.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("invalid manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Loads and parses the manifest at the given path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading manifest from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read manifest {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Serializes the manifest to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("cannot serialize manifest: {}", e)))
    }

    /// Writes the manifest to the given path, replacing any previous file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.templates.is_empty() {
            return Err(Error::ConfigError("unable to write empty manifest".to_string()));
        }
        debug!("writing manifest to {}", path.display());
        fs::write(path, self.to_yaml()?).map_err(Error::IoError)
    }

    /// Finds a template spec by its `directory` identity key.
    pub fn find_directory(&self, directory: &str) -> Option<&TemplateSpec> {
        self.templates.iter().find(|t| t.directory == directory)
    }

    fn validate(&self) -> Result<()> {
        for spec in &self.templates {
            if spec.directory.is_empty() {
                return Err(Error::ConfigError(
                    "template is missing required field 'directory'".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for param in &spec.params {
                if param.name.is_empty() {
                    return Err(Error::ConfigError(format!(
                        "template '{}' has a parameter without a name",
                        spec.directory
                    )));
                }
                if !seen.insert(param.name.as_str()) {
                    return Err(Error::ConfigError(format!(
                        "template '{}' declares duplicate parameter '{}'",
                        spec.directory, param.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Merges a refreshed template spec with the prior persisted entry for the
/// same `directory`. Structure (globs, hook lists, params and their prompts)
/// always follows the refreshed spec; `repository` follows the prior entry.
/// A refreshed parameter takes the prior value only when the prior parameter
/// was prompted, so fixed-value parameters track the template author while
/// user answers are never regressed.
pub fn merge(refreshed: &TemplateSpec, prior: &TemplateSpec) -> TemplateSpec {
    let prior_values: IndexMap<&str, &str> = prior
        .params
        .iter()
        .filter(|p| p.prompt.is_some())
        .filter_map(|p| p.value.as_deref().map(|v| (p.name.as_str(), v)))
        .collect();

    let params = refreshed
        .params
        .iter()
        .map(|p| {
            let mut param = p.clone();
            if let Some(value) = prior_values.get(p.name.as_str()) {
                param.value = Some((*value).to_string());
            }
            param
        })
        .collect();

    TemplateSpec {
        repository: prior.repository.clone(),
        directory: refreshed.directory.clone(),
        params,
        raw_copy: refreshed.raw_copy.clone(),
        init_only: refreshed.init_only.clone(),
        pre_init_hooks: refreshed.pre_init_hooks.clone(),
        post_init_hooks: refreshed.post_init_hooks.clone(),
        pre_update_hooks: refreshed.pre_update_hooks.clone(),
        post_update_hooks: refreshed.post_update_hooks.clone(),
    }
}

/// Builds the resolved-parameter mapping from a list of resolved params,
/// preserving declaration order.
pub fn param_values(params: &[ParamSpec]) -> IndexMap<String, String> {
    params
        .iter()
        .map(|p| (p.name.clone(), p.value.clone().unwrap_or_default()))
        .collect()
}

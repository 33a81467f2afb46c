use crate::budgets::TokenBudgets;
use crate::error::{DocwrightError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tailors the fixed paragraph inserted into the agent system prompt
/// (spec.md §6 "Configuration inputs").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocType {
    Api,
    Architecture,
    UserGuide,
    Developer,
}

impl Default for DocType {
    fn default() -> Self {
        DocType::Developer
    }
}

impl DocType {
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            DocType::Api => {
                "Emphasize public API surface: function signatures, parameters, return types, and usage examples."
            }
            DocType::Architecture => {
                "Emphasize structural relationships: how this module fits into the surrounding system, its dependencies and dependents."
            }
            DocType::UserGuide => {
                "Emphasize practical usage: what a consumer of this module needs to know to use it correctly."
            }
            DocType::Developer => {
                "Emphasize implementation detail: internal invariants, control flow, and the reasoning behind non-obvious choices."
            }
        }
    }
}

/// Every configuration input enumerated in spec.md §6.
///
/// Loaded by `docwright-cli` from an optional TOML file, then layered with
/// `DOCWRIGHT_*` environment variables, then CLI flags — each layer
/// overriding the previous — via the `config` crate, matching the layering
/// convention of the teacher's settings loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub repository_root: PathBuf,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub include_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub focus_modules: Vec<String>,
    #[serde(default)]
    pub doc_type: DocType,
    #[serde(default)]
    pub custom_instructions: Option<String>,
    pub main_model: String,
    pub cluster_model: String,
    #[serde(default)]
    pub fallback_models: Vec<String>,
    #[serde(default)]
    pub budgets: TokenBudgets,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl RunConfig {
    /// Load from an optional TOML file, overlaid with `DOCWRIGHT_`-prefixed
    /// environment variables. `repository_root` and `output_directory` are
    /// not config-persistable concerns beyond this layering — no keychain,
    /// no user-home persistence (spec.md §1 "Deliberately OUT of scope").
    pub fn load(file: Option<&std::path::Path>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::Environment::with_prefix("DOCWRIGHT")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .build()
            .map_err(|e| DocwrightError::Configuration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| DocwrightError::Configuration(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.main_model.trim().is_empty() {
            return Err(DocwrightError::Configuration(
                "main_model must not be empty".into(),
            ));
        }
        if self.cluster_model.trim().is_empty() {
            return Err(DocwrightError::Configuration(
                "cluster_model must not be empty".into(),
            ));
        }
        if !self.repository_root.exists() {
            return Err(DocwrightError::Configuration(format!(
                "repository_root does not exist: {}",
                self.repository_root.display()
            )));
        }
        Ok(())
    }
}

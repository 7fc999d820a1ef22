//! Run configuration: external tool locations, pre-flight policy and the
//! credential the discovery modules need.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Built-in defaults.
    #[default]
    Default,
    /// `--config <path>`.
    Flag(PathBuf),
    /// `$RECON_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// `$RECON_CONFIG_JSON`.
    EnvInline,
    /// A default file in the working directory.
    File(PathBuf),
}

/// Executable names (or absolute paths) of the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// recon-ng command line front end.
    pub engine: String,
    /// nmap.
    pub scanner: String,
    /// EyeWitness, only needed for directory output.
    pub fingerprinter: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            engine: "recon-cli".to_string(),
            scanner: "nmap".to_string(),
            fingerprinter: "eyewitness".to_string(),
        }
    }
}

/// How many of the required tools must be present for pre-flight to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// Every tool the selected run invokes.
    #[default]
    All,
    /// At least one tool; the permissive legacy check.
    Any,
}

/// The API key the Shodan discovery modules need.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Key name as registered with the engine (`keys list`).
    pub name: String,
    /// Environment variable consulted before prompting the operator.
    pub env_var: Option<String>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            name: "shodan_api".to_string(),
            env_var: Some("SHODAN_API_KEY".to_string()),
        }
    }
}

/// Complete run configuration; every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconConfig {
    /// External executables.
    pub tools: ToolsConfig,
    /// Pre-flight strictness.
    pub probe_policy: ProbePolicy,
    /// API key provisioning.
    pub credential: CredentialConfig,
    /// Parent directory for the per-run scratch directory.
    pub scratch_dir: Option<PathBuf>,
}

const ENV_PATH: &str = "RECON_CONFIG_PATH";
const ENV_INLINE: &str = "RECON_CONFIG_JSON";
const DEFAULT_FILES: &[&str] = &["recon.toml", "config/recon.toml"];

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl ConfigSource {
    /// First configured source, in precedence order. Nothing is read yet.
    fn discover(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Flag(path.to_path_buf());
        }
        if let Some(path) = non_empty_env(ENV_PATH) {
            return Self::EnvPath(PathBuf::from(path));
        }
        if non_empty_env(ENV_INLINE).is_some() {
            return Self::EnvInline;
        }
        DEFAULT_FILES
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
            .map(|path| Self::File(path.to_path_buf()))
            .unwrap_or_default()
    }
}

impl ReconConfig {
    /// Load configuration from the first source that is set:
    /// the `--config` flag, `$RECON_CONFIG_PATH`, `$RECON_CONFIG_JSON`
    /// (inline JSON), `recon.toml` / `config/recon.toml` in the working
    /// directory. Falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let source = ConfigSource::discover(explicit);
        let config = match &source {
            ConfigSource::Default => Ok(Self::default()),
            ConfigSource::EnvInline => {
                let raw = non_empty_env(ENV_INLINE).unwrap_or_default();
                serde_json::from_str(&raw)
                    .with_context(|| format!("invalid config in ${ENV_INLINE}"))
            }
            ConfigSource::Flag(path)
            | ConfigSource::EnvPath(path)
            | ConfigSource::File(path) => Self::from_file(path),
        }
        .map_err(ReconError::Config)?;
        Ok((config, source))
    }

    /// Parse `path` as JSON when it has a `.json` extension, TOML otherwise.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid config in {}", path.display()))
        } else {
            toml::from_str(&contents)
                .with_context(|| format!("invalid config in {}", path.display()))
        }
    }
}

//! Fatal error taxonomy and pipeline phase names.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Pipeline phase, used to label log lines and the fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Required tools are looked up on the search path.
    Probe,
    /// Missing engine modules are installed.
    Install,
    /// The third-party API key is registered.
    Credentials,
    /// The per-run scratch directory is created.
    Allocate,
    /// Operator input is loaded into the workspace.
    Ingest,
    /// Passive discovery modules run.
    Discovery,
    /// Discovered addresses are written to the scan list.
    Extract,
    /// nmap runs against the scan list.
    Scan,
    /// EyeWitness screenshots the scan list.
    Fingerprint,
    /// The scan report is merged into the workspace.
    Import,
    /// The ports table is rendered to the output file.
    Report,
    /// Transient files are removed.
    Cleanup,
}

impl Stage {
    /// Human-readable phase name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Probe => "pre-flight",
            Stage::Install => "module installation",
            Stage::Credentials => "credential provisioning",
            Stage::Allocate => "scratch allocation",
            Stage::Ingest => "target ingestion",
            Stage::Discovery => "passive discovery",
            Stage::Extract => "address extraction",
            Stage::Scan => "active scan",
            Stage::Fingerprint => "service fingerprinting",
            Stage::Import => "result import",
            Stage::Report => "reporting",
            Stage::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal pipeline failures.
///
/// Provisioning (module install, credential registration) and cleanup
/// problems never surface here; those stages log a warning and the run
/// continues.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Tools the run needs are not on the search path.
    #[error("pre-flight failed: required tools not found on PATH: {}", .missing.join(", "))]
    MissingTools {
        /// Names of the tools that were not found.
        missing: Vec<String>,
    },
    /// An external tool could not be spawned or exited non-zero.
    #[error("{stage} failed: {program}: {detail}")]
    Invocation {
        /// Phase that ran the tool.
        stage: Stage,
        /// Executable that failed.
        program: String,
        /// Exit status and the tool's last diagnostic line.
        detail: String,
    },
    /// A transient file or output directory could not be written.
    #[error("{stage} failed: {}: {source}", .path.display())]
    Io {
        /// Phase that touched the path.
        stage: Stage,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Operator input rejected before any stage runs.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Configuration could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Config(#[source] anyhow::Error),
    /// The secret prompt failed.
    #[error("credential provisioning failed: could not read operator input: {0}")]
    Prompt(String),
}

impl ReconError {
    /// Phase that raised the error, when it belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ReconError::MissingTools { .. } => Some(Stage::Probe),
            ReconError::Invocation { stage, .. }
            | ReconError::Io { stage, .. } => Some(*stage),
            ReconError::Prompt(_) => Some(Stage::Credentials),
            ReconError::InvalidInput(_) | ReconError::Config(_) => None,
        }
    }

    pub(crate) fn io(
        stage: Stage,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        ReconError::Io {
            stage,
            path: path.into(),
            source,
        }
    }
}

/// Result alias defaulting to [`ReconError`].
pub type Result<T, E = ReconError> = std::result::Result<T, E>;

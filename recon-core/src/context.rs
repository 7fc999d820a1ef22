//! Operator input for one run.
//!
//! A [`RunContext`] is validated once at construction and never mutated; every
//! stage borrows it.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{ReconError, Result};

/// Which kind of target the run starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A domain name handed straight to the discovery modules.
    Domain,
    /// A newline-delimited file of IP addresses.
    IpFile,
    /// A prior nmap XML report.
    ScanReport,
}

impl InputMode {
    /// Name used in logs and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Domain => "domain",
            InputMode::IpFile => "ip-file",
            InputMode::ScanReport => "scan-report",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report file format, one per engine reporting module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `reporting/csv`
    Csv,
    /// `reporting/json`
    Json,
    /// `reporting/xlsx`
    Spreadsheet,
}

impl OutputFormat {
    /// Engine reporting module that renders this format.
    pub fn module_id(self) -> &'static str {
        match self {
            OutputFormat::Csv => "reporting/csv",
            OutputFormat::Json => "reporting/json",
            OutputFormat::Spreadsheet => "reporting/xlsx",
        }
    }

    /// File extension used for `<workspace>.<ext>` reports.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Spreadsheet => "xlsx",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ReconError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "xlsx" | "excel" => Ok(OutputFormat::Spreadsheet),
            other => Err(ReconError::InvalidInput(format!(
                "unsupported output format '{other}' (expected csv, json or xlsx)"
            ))),
        }
    }
}

/// Where the run writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDestination {
    /// Report file path.
    pub report: PathBuf,
    /// Set only when the operator pointed `-f` at a directory.
    pub fingerprint_dir: Option<PathBuf>,
}

impl OutputDestination {
    /// Resolve the destination for `output_path`.
    ///
    /// An existing directory, or a path ending in a separator, receives
    /// `<workspace>.<ext>` plus a `fingerprints` subdirectory for the
    /// fingerprinting tool; anything else is taken as the report file itself.
    pub fn resolve(
        output_path: &Path,
        workspace: &str,
        format: OutputFormat,
    ) -> Self {
        if output_path.is_dir() || names_directory(output_path) {
            Self {
                report: output_path
                    .join(format!("{workspace}.{}", format.extension())),
                fingerprint_dir: Some(output_path.join("fingerprints")),
            }
        } else {
            Self {
                report: output_path.to_path_buf(),
                fingerprint_dir: None,
            }
        }
    }
}

fn names_directory(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

/// Validated operator input for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    mode: InputMode,
    target: String,
    workspace: String,
    format: OutputFormat,
    destination: OutputDestination,
}

impl RunContext {
    /// Validate operator input.
    ///
    /// Rejects workspace names outside `[A-Za-z0-9._-]`, domains that would
    /// break a `KEY=VALUE` option, missing input files and an empty output
    /// path.
    pub fn new(
        mode: InputMode,
        target: impl Into<String>,
        workspace: impl Into<String>,
        format: OutputFormat,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let target = target.into().trim().to_string();
        let workspace = workspace.into().trim().to_string();
        let output_path = output_path.into();

        validate_workspace(&workspace)?;
        match mode {
            InputMode::Domain => validate_domain(&target)?,
            InputMode::IpFile | InputMode::ScanReport => {
                if !Path::new(&target).is_file() {
                    return Err(ReconError::InvalidInput(format!(
                        "{mode} input {target} is not a readable file"
                    )));
                }
            }
        }
        if output_path.as_os_str().is_empty() {
            return Err(ReconError::InvalidInput(
                "output path must not be empty".into(),
            ));
        }

        let destination =
            OutputDestination::resolve(&output_path, &workspace, format);
        Ok(Self {
            mode,
            target,
            workspace,
            format,
            destination,
        })
    }

    /// Which kind of target the run starts from.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Domain name, or the input file path in file/report modes.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// [`Self::target`] as a path, for the file modes.
    pub fn target_path(&self) -> &Path {
        Path::new(&self.target)
    }

    /// Engine workspace all state is written to.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Report format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Resolved report and fingerprint locations.
    pub fn destination(&self) -> &OutputDestination {
        &self.destination
    }

    /// The domain to seed discovery modules with, only in domain mode.
    pub fn domain(&self) -> Option<&str> {
        matches!(self.mode, InputMode::Domain).then_some(self.target.as_str())
    }
}

fn validate_workspace(workspace: &str) -> Result<()> {
    if workspace.is_empty() {
        return Err(ReconError::InvalidInput(
            "workspace name must not be empty".into(),
        ));
    }
    if let Some(bad) = workspace
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ReconError::InvalidInput(format!(
            "workspace name '{workspace}' contains unsupported character '{bad}'"
        )));
    }
    Ok(())
}

fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(ReconError::InvalidInput("domain must not be empty".into()));
    }
    // The domain ends up inside a KEY=VALUE engine option.
    if domain.starts_with('-')
        || domain.chars().any(|c| c.is_whitespace() || c == '=')
    {
        return Err(ReconError::InvalidInput(format!(
            "'{domain}' is not a valid domain name"
        )));
    }
    Ok(())
}

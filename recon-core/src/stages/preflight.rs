//! Environment prober: are the external tools reachable on the search path?

use std::{env, ffi::OsString, path::PathBuf};

use tracing::{debug, info, warn};

use crate::{
    config::{ProbePolicy, ToolsConfig},
    error::{ReconError, Result},
};

/// Tools the selected run will invoke.
pub fn required_tools(tools: &ToolsConfig, fingerprint: bool) -> Vec<&str> {
    let mut required = vec![tools.engine.as_str(), tools.scanner.as_str()];
    if fingerprint {
        required.push(tools.fingerprinter.as_str());
    }
    required
}

/// Outcome of a successful probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// Tools found, with their resolved paths.
    pub found: Vec<(String, PathBuf)>,
    /// Tools not found; non-empty only under [`ProbePolicy::Any`].
    pub missing: Vec<String>,
}

/// Looks tools up on a search path under a [`ProbePolicy`].
#[derive(Debug, Clone)]
pub struct EnvironmentProber {
    search_path: Option<OsString>,
    cwd: PathBuf,
    policy: ProbePolicy,
}

impl EnvironmentProber {
    /// Probe the process `PATH`.
    pub fn from_env(policy: ProbePolicy) -> Self {
        Self {
            search_path: env::var_os("PATH"),
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            policy,
        }
    }

    /// Probe an explicit search path instead of `PATH`.
    pub fn with_search_path(
        search_path: impl Into<OsString>,
        policy: ProbePolicy,
    ) -> Self {
        Self {
            search_path: Some(search_path.into()),
            cwd: PathBuf::from("."),
            policy,
        }
    }

    /// Resolve `tool` to an executable on the search path.
    pub fn locate(&self, tool: &str) -> Option<PathBuf> {
        which::which_in(tool, self.search_path.as_ref(), &self.cwd).ok()
    }

    /// Check `tools` against the policy. Runs before any external state is
    /// touched.
    pub fn probe(&self, tools: &[&str]) -> Result<ProbeReport> {
        let mut report = ProbeReport::default();
        for tool in tools {
            match self.locate(tool) {
                Some(path) => {
                    debug!(tool, path = %path.display(), "found tool");
                    report.found.push((tool.to_string(), path));
                }
                None => report.missing.push(tool.to_string()),
            }
        }

        let satisfied = match self.policy {
            ProbePolicy::All => report.missing.is_empty(),
            ProbePolicy::Any => !report.found.is_empty(),
        };
        if !satisfied {
            return Err(ReconError::MissingTools {
                missing: report.missing,
            });
        }
        if !report.missing.is_empty() {
            warn!(
                missing = %report.missing.join(", "),
                "Some tools are missing; later stages that need them will fail"
            );
        }
        info!(found = report.found.len(), "Installation pre-checks passed");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt, path::Path};

    use super::*;

    fn install_fake(dir: &Path, name: &str) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    const TOOLS: [&str; 3] = ["recon-cli", "nmap", "eyewitness"];

    #[test]
    fn any_policy_passes_with_a_single_tool() {
        let bin = tempfile::tempdir().unwrap();
        install_fake(bin.path(), "nmap");
        let prober =
            EnvironmentProber::with_search_path(bin.path(), ProbePolicy::Any);
        let report = prober.probe(&TOOLS).unwrap();
        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].0, "nmap");
        assert_eq!(report.missing, ["recon-cli", "eyewitness"]);
    }

    #[test]
    fn any_policy_fails_when_nothing_is_installed() {
        let bin = tempfile::tempdir().unwrap();
        let prober =
            EnvironmentProber::with_search_path(bin.path(), ProbePolicy::Any);
        let err = prober.probe(&TOOLS).unwrap_err();
        assert!(matches!(err, ReconError::MissingTools { ref missing } if missing.len() == 3));
    }

    #[test]
    fn all_policy_names_every_missing_tool() {
        let bin = tempfile::tempdir().unwrap();
        install_fake(bin.path(), "nmap");
        let prober =
            EnvironmentProber::with_search_path(bin.path(), ProbePolicy::All);
        let err = prober.probe(&TOOLS[..2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pre-flight failed: required tools not found on PATH: recon-cli"
        );

        install_fake(bin.path(), "recon-cli");
        assert!(prober.probe(&TOOLS[..2]).is_ok());
    }

    #[test]
    fn non_executable_files_do_not_count() {
        let bin = tempfile::tempdir().unwrap();
        fs::write(bin.path().join("nmap"), "").unwrap();
        let prober =
            EnvironmentProber::with_search_path(bin.path(), ProbePolicy::Any);
        assert!(prober.locate("nmap").is_none());
    }

    #[test]
    fn fingerprinter_only_required_with_directory_output() {
        let tools = ToolsConfig::default();
        assert_eq!(required_tools(&tools, false), ["recon-cli", "nmap"]);
        assert_eq!(
            required_tools(&tools, true),
            ["recon-cli", "nmap", "eyewitness"]
        );
    }
}

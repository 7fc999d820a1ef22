//! Cleanup handler. Never fails the run.

use std::{fs, io, path::PathBuf};

use tracing::{debug, info, warn};

use crate::artifacts::RunArtifacts;

/// Result of one cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Files deleted.
    pub removed: Vec<PathBuf>,
    /// Files that were never created.
    pub absent: Vec<PathBuf>,
    /// Paths the operator has to remove manually.
    pub failed: Vec<PathBuf>,
}

impl CleanupReport {
    /// `true` when nothing was left behind.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove every transient file (remove-if-exists), then the run directory.
pub fn cleanup(artifacts: RunArtifacts) -> CleanupReport {
    info!("Cleaning up temporary files");
    let mut report = CleanupReport::default();

    for path in artifacts.transient_files() {
        match fs::remove_file(path) {
            Ok(()) => report.removed.push(path.to_path_buf()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "nothing to remove");
                report.absent.push(path.to_path_buf());
            }
            Err(err) => {
                warn!(path = %path.display(), "failed to remove: {err}");
                report.failed.push(path.to_path_buf());
            }
        }
    }

    let dir = artifacts.into_dir();
    let dir_path = dir.path().to_path_buf();
    if let Err(err) = dir.close() {
        warn!(path = %dir_path.display(), "failed to remove: {err}");
        report.failed.push(dir_path);
    }

    if !report.is_clean() {
        let paths: Vec<String> =
            report.failed.iter().map(|p| p.display().to_string()).collect();
        warn!(
            "Unable to remove temporary files. Please delete {} manually..",
            paths.join(" and ")
        );
    }
    report
}

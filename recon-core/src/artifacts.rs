//! Per-run scratch space for the files handed between stages.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ReconError, Result, Stage};

const ADDRESS_LIST: &str = "address-list.txt";
const SCAN_REPORT: &str = "scan-report.xml";

/// Per-run scratch directory holding the files handed between stages.
///
/// The directory is unique per run, so concurrent runs on one host never share
/// intermediate files. Dropping the guard removes it on every exit path.
#[derive(Debug)]
pub struct RunArtifacts {
    dir: TempDir,
    address_list: PathBuf,
    scan_report: PathBuf,
}

impl RunArtifacts {
    /// Create a fresh `recon-*` directory under `parent`, or under the system
    /// temp dir when no parent is configured.
    pub fn allocate(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("recon-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|err| {
            ReconError::io(
                Stage::Allocate,
                parent
                    .map(Path::to_path_buf)
                    .unwrap_or_else(std::env::temp_dir),
                err,
            )
        })?;

        let address_list = dir.path().join(ADDRESS_LIST);
        let scan_report = dir.path().join(SCAN_REPORT);
        Ok(Self {
            dir,
            address_list,
            scan_report,
        })
    }

    /// Root of the scratch directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Active-scan input written by the address extractor.
    pub fn address_list(&self) -> &Path {
        &self.address_list
    }

    /// nmap XML output, imported after the scan.
    pub fn scan_report(&self) -> &Path {
        &self.scan_report
    }

    /// Every file the pipeline may create, whether or not it exists yet.
    pub fn transient_files(&self) -> [&Path; 2] {
        [&self.address_list, &self.scan_report]
    }

    pub(crate) fn into_dir(self) -> TempDir {
        self.dir
    }
}

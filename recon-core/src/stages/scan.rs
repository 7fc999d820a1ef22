//! Active scan runner: nmap against the extracted list, plus optional
//! EyeWitness fingerprinting.

use std::path::Path;

use tracing::info;

use crate::{
    error::{ReconError, Result, Stage},
    process::{ProcessRunner, invoke},
    tools::scanner,
};

/// Service/version scan of every address in `address_list`, XML to `report`.
/// An empty list is valid input; nmap simply reports zero hosts.
pub async fn run_active_scan(
    runner: &dyn ProcessRunner,
    scanner_bin: &str,
    address_list: &Path,
    report: &Path,
) -> Result<()> {
    info!(
        "Beginning active recon. Be sure you have permission to scan these IP addresses..."
    );
    let spec = scanner::nmap_spec(scanner_bin, address_list, report);
    invoke(runner, Stage::Scan, &spec).await?;
    Ok(())
}

/// Screenshot every address into `directory`, creating it first.
pub async fn run_fingerprint(
    runner: &dyn ProcessRunner,
    fingerprinter_bin: &str,
    address_list: &Path,
    directory: &Path,
) -> Result<()> {
    tokio::fs::create_dir_all(directory)
        .await
        .map_err(|err| ReconError::io(Stage::Fingerprint, directory, err))?;
    let spec = scanner::fingerprint_spec(fingerprinter_bin, address_list, directory);
    invoke(runner, Stage::Fingerprint, &spec).await?;
    info!(dir = %directory.display(), "Fingerprint artifacts written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandOutput, MockProcessRunner};

    #[tokio::test]
    async fn scanner_crash_is_fatal() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(CommandOutput::failed(139, "segmentation fault")));
        let err = run_active_scan(
            &runner,
            "nmap",
            Path::new("list.txt"),
            Path::new("scan.xml"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReconError::Invocation { stage: Stage::Scan, .. }));
    }

    #[tokio::test]
    async fn scanner_not_found_is_fatal() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        });
        let err = run_active_scan(
            &runner,
            "nmap",
            Path::new("list.txt"),
            Path::new("scan.xml"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Scan));
    }

    #[tokio::test]
    async fn fingerprint_creates_its_directory() {
        let out = tempfile::tempdir().unwrap();
        let dir = out.path().join("fingerprints");
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|spec| spec.program == "eyewitness")
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        run_fingerprint(&runner, "eyewitness", Path::new("list.txt"), &dir)
            .await
            .unwrap();
        assert!(dir.is_dir());
    }
}

//! Result importer: merges an nmap XML report into the workspace.

use std::path::Path;

use tracing::info;

use crate::{
    error::{Result, Stage},
    process::{ProcessRunner, invoke},
    tools::engine,
};

/// Import `report` into `workspace`. Idempotent on the engine side, so the
/// pipeline may call it once to seed and once after the active scan.
pub async fn import_scan_report(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    workspace: &str,
    report: &Path,
    stage: Stage,
) -> Result<()> {
    let module = engine::import_scan_module(report);
    let spec = engine::run_module_spec(engine_bin, workspace, &module);
    invoke(runner, stage, &spec).await?;
    info!(report = %report.display(), "Scan results imported into {workspace}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ReconError,
        process::{CommandOutput, MockProcessRunner},
    };

    #[tokio::test]
    async fn points_import_module_at_report() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|spec| {
                spec.args
                    == [
                        "-w",
                        "acme",
                        "-m",
                        "import/nmap",
                        "-o",
                        "FILENAME=/tmp/recon-x/scan-report.xml",
                        "-x",
                    ]
            })
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        import_scan_report(
            &runner,
            "recon-cli",
            "acme",
            Path::new("/tmp/recon-x/scan-report.xml"),
            Stage::Import,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn failure_carries_the_callers_stage() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(CommandOutput::failed(1, "malformed XML")));
        let err = import_scan_report(
            &runner,
            "recon-cli",
            "acme",
            Path::new("bad.xml"),
            Stage::Import,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReconError::Invocation { stage: Stage::Import, .. }));
        assert!(err.to_string().starts_with("result import failed"));
    }
}

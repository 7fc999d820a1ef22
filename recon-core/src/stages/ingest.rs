//! Target ingestor: turns the operator's input into a populated workspace.

use tracing::info;

use crate::{
    context::{InputMode, RunContext},
    error::{Result, Stage},
    process::{ProcessRunner, invoke},
    stages::import,
    tools::engine,
};

/// What ingestion loaded into the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// Domain mode: the domain travels as a module option instead.
    Nothing,
    /// `import/list` loaded the operator's address file.
    AddressFile,
    /// `import/nmap` loaded the operator's scan report.
    ScanReport,
}

/// Seed the workspace for `ctx`. Any failure aborts the run.
pub async fn ingest(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    ctx: &RunContext,
) -> Result<Ingested> {
    match ctx.mode() {
        InputMode::Domain => Ok(Ingested::Nothing),
        InputMode::IpFile => {
            info!(file = %ctx.target(), "Importing address list into workspace");
            let module = engine::import_list_module(ctx.target_path());
            let spec = engine::run_module_spec(engine_bin, ctx.workspace(), &module);
            invoke(runner, Stage::Ingest, &spec).await?;
            Ok(Ingested::AddressFile)
        }
        InputMode::ScanReport => {
            info!(report = %ctx.target(), "Seeding workspace from prior scan report");
            import::import_scan_report(
                runner,
                engine_bin,
                ctx.workspace(),
                ctx.target_path(),
                Stage::Ingest,
            )
            .await?;
            Ok(Ingested::ScanReport)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::OutputFormat,
        error::ReconError,
        process::{CommandOutput, MockProcessRunner},
    };

    fn file_ctx(mode: InputMode) -> (tempfile::TempDir, RunContext) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        std::fs::write(&input, "10.0.0.1\n").unwrap();
        let ctx = RunContext::new(
            mode,
            input.display().to_string(),
            "ws",
            OutputFormat::Csv,
            "out.csv",
        )
        .unwrap();
        (dir, ctx)
    }

    #[tokio::test]
    async fn domain_mode_invokes_nothing() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();
        let ctx = RunContext::new(
            InputMode::Domain,
            "example.com",
            "ws",
            OutputFormat::Csv,
            "out.csv",
        )
        .unwrap();
        assert_eq!(
            ingest(&runner, "recon-cli", &ctx).await.unwrap(),
            Ingested::Nothing
        );
    }

    #[tokio::test]
    async fn ip_file_uses_list_import() {
        let (_dir, ctx) = file_ctx(InputMode::IpFile);
        let expected = format!("FILENAME={}", ctx.target());
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(move |spec| {
                spec.args[..4] == ["-w", "ws", "-m", "import/list"]
                    && spec.args.contains(&expected)
                    && spec.args.contains(&"COLUMN=ip_address".to_string())
            })
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        assert_eq!(
            ingest(&runner, "recon-cli", &ctx).await.unwrap(),
            Ingested::AddressFile
        );
    }

    #[tokio::test]
    async fn scan_report_mode_imports_operator_report() {
        let (_dir, ctx) = file_ctx(InputMode::ScanReport);
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|spec| spec.args.contains(&"import/nmap".to_string()))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        assert_eq!(
            ingest(&runner, "recon-cli", &ctx).await.unwrap(),
            Ingested::ScanReport
        );
    }

    #[tokio::test]
    async fn ingestion_failure_is_fatal() {
        let (_dir, ctx) = file_ctx(InputMode::IpFile);
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(CommandOutput::failed(1, "no such workspace")));
        let err = ingest(&runner, "recon-cli", &ctx).await.unwrap_err();
        assert!(matches!(err, ReconError::Invocation { stage: Stage::Ingest, .. }));
    }
}

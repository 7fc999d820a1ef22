//! Pipeline orchestrator.
//!
//! Stages run strictly in order, each gated on the success of the previous
//! one: pre-flight, ingestion, passive discovery, address extraction, active
//! scan, result import, reporting, cleanup. Once the scratch directory exists,
//! cleanup runs whatever the outcome.

use std::{fmt, path::PathBuf, time::Instant};

use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::{
    artifacts::RunArtifacts,
    config::ReconConfig,
    context::RunContext,
    error::{Result, Stage},
    process::ProcessRunner,
    prompt::SecretPrompt,
    stages::{
        self, AddressList, CleanupReport, CredentialOutcome, EnvironmentProber,
        Ingested, InstallOutcome,
    },
    tools,
};

/// Switches for the best-effort provisioning steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Skip the module listing and marketplace installs.
    pub skip_install: bool,
    /// Skip the API key check.
    pub skip_credentials: bool,
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// Stages in the order they completed.
    pub stages: Vec<Stage>,
    /// Modules installed during pre-flight.
    pub installed: InstallOutcome,
    /// `None` when credential provisioning was skipped.
    pub credential: Option<CredentialOutcome>,
    /// Addresses handed to the active scan.
    pub addresses: AddressList,
    /// Report file written by the engine.
    pub report: PathBuf,
    /// Screenshot directory, for directory output.
    pub fingerprint_dir: Option<PathBuf>,
    /// What the cleanup handler removed.
    pub cleanup: CleanupReport,
}

/// Runs every stage for one [`RunContext`], borrowing its collaborators.
pub struct Pipeline<'a> {
    config: &'a ReconConfig,
    runner: &'a dyn ProcessRunner,
    prompt: &'a dyn SecretPrompt,
    prober: EnvironmentProber,
    options: PipelineOptions,
}

impl fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", self.config)
            .field("prober", &self.prober)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    /// Pipeline probing the process `PATH` with the configured policy.
    pub fn new(
        config: &'a ReconConfig,
        runner: &'a dyn ProcessRunner,
        prompt: &'a dyn SecretPrompt,
    ) -> Self {
        Self {
            config,
            runner,
            prompt,
            prober: EnvironmentProber::from_env(config.probe_policy),
            options: PipelineOptions::default(),
        }
    }

    /// Replace the environment prober.
    pub fn with_prober(mut self, prober: EnvironmentProber) -> Self {
        self.prober = prober;
        self
    }

    /// Set the provisioning switches.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the whole pipeline.
    ///
    /// The first fatal stage failure is returned after cleanup has run.
    pub async fn run(&self, ctx: &RunContext) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "recon_run",
            %run_id,
            mode = %ctx.mode(),
            workspace = ctx.workspace()
        );
        self.run_inner(ctx, run_id).instrument(span).await
    }

    async fn run_inner(
        &self,
        ctx: &RunContext,
        run_id: Uuid,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary {
            run_id,
            stages: Vec::new(),
            installed: InstallOutcome::default(),
            credential: None,
            addresses: AddressList::default(),
            report: ctx.destination().report.clone(),
            fingerprint_dir: ctx.destination().fingerprint_dir.clone(),
            cleanup: CleanupReport::default(),
        };

        info!(
            "Attempting automatic passive and active recon on {}. This could take some time...",
            ctx.target()
        );
        self.preflight(ctx, &mut summary).await?;

        let artifacts =
            RunArtifacts::allocate(self.config.scratch_dir.as_deref())?;
        let outcome = self.execute(ctx, &artifacts, &mut summary).await;
        summary.cleanup = stages::cleanup(artifacts);
        summary.stages.push(Stage::Cleanup);
        outcome?;

        info!(
            elapsed = %humantime::format_duration(started.elapsed()),
            "Recon run complete"
        );
        Ok(summary)
    }

    async fn preflight(
        &self,
        ctx: &RunContext,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let bins = &self.config.tools;
        info!("Beginning installation pre-checks..");
        let required = stages::required_tools(
            bins,
            ctx.destination().fingerprint_dir.is_some(),
        );
        self.prober.probe(&required)?;
        summary.stages.push(Stage::Probe);

        if !self.options.skip_install {
            summary.installed = stages::ensure_modules(
                self.runner,
                &bins.engine,
                &tools::required_modules(ctx.mode()),
            )
            .await;
            summary.stages.push(Stage::Install);
        }

        if !self.options.skip_credentials {
            summary.credential = Some(
                stages::ensure_credential(
                    self.runner,
                    &bins.engine,
                    &self.config.credential,
                    self.prompt,
                )
                .await,
            );
            summary.stages.push(Stage::Credentials);
        }
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &RunContext,
        artifacts: &RunArtifacts,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let bins = &self.config.tools;
        let engine = bins.engine.as_str();
        let workspace = ctx.workspace();

        if stages::ingest(self.runner, engine, ctx).await? != Ingested::Nothing
        {
            summary.stages.push(Stage::Ingest);
        }

        info!(
            "Pre-checks passed. Beginning passive recon on {}. This can take some time...",
            ctx.target()
        );
        let plan = tools::discovery_plan(ctx.mode(), ctx.domain());
        stages::run_discovery(self.runner, engine, workspace, &plan).await?;
        summary.stages.push(Stage::Discovery);

        summary.addresses = stages::extract_addresses(
            self.runner,
            engine,
            workspace,
            artifacts.address_list(),
        )
        .await?;
        summary.stages.push(Stage::Extract);
        info!("Passive recon completed.");

        stages::run_active_scan(
            self.runner,
            &bins.scanner,
            artifacts.address_list(),
            artifacts.scan_report(),
        )
        .await?;
        summary.stages.push(Stage::Scan);

        if let Some(dir) = &ctx.destination().fingerprint_dir {
            stages::run_fingerprint(
                self.runner,
                &bins.fingerprinter,
                artifacts.address_list(),
                dir,
            )
            .await?;
            summary.stages.push(Stage::Fingerprint);
        }
        info!("Active recon completed on {}.", ctx.target());

        stages::import_scan_report(
            self.runner,
            engine,
            workspace,
            artifacts.scan_report(),
            Stage::Import,
        )
        .await?;
        summary.stages.push(Stage::Import);

        stages::emit_report(
            self.runner,
            engine,
            workspace,
            ctx.format(),
            &ctx.destination().report,
        )
        .await?;
        summary.stages.push(Stage::Report);
        Ok(())
    }
}

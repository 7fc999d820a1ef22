//! `recon`: one-command passive and active reconnaissance.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use recon_core::{
    InputMode, OutputFormat, Pipeline, PipelineOptions, ProbePolicy,
    ReconConfig, RunContext, RunSummary, SystemRunner,
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod prompt;

use prompt::TerminalPrompt;

#[derive(Debug, Parser)]
#[command(
    name = "recon",
    version,
    about = "Automated passive (recon-ng) and active (nmap) reconnaissance"
)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recon starting from a domain name
    Domain {
        /// The domain to recon
        domain: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Recon over a newline-delimited file of IP addresses
    Ip {
        /// File with one IP address per line
        file: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Recon seeded from a prior nmap XML report
    Nmap {
        /// nmap XML report (-oX output)
        report: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// The output format
    #[arg(short = 'o', long = "output", value_enum)]
    output: FormatArg,
    /// The name of the workspace to use for this run
    #[arg(short, long)]
    workspace: String,
    /// Name or path of output file; a directory also enables screenshots
    #[arg(short = 'f', long = "filename")]
    filename: PathBuf,
    /// Pre-flight tool check: all required tools, or any one of them
    #[arg(long, value_enum)]
    preflight: Option<PreflightArg>,
    /// Do not install missing recon-ng modules
    #[arg(long)]
    skip_install: bool,
    /// Do not check or register the API key
    #[arg(long)]
    skip_credentials: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    #[value(alias = "excel")]
    Xlsx,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PreflightArg {
    All,
    Any,
}

impl From<FormatArg> for OutputFormat {
    fn from(val: FormatArg) -> Self {
        match val {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Xlsx => OutputFormat::Spreadsheet,
        }
    }
}

impl From<PreflightArg> for ProbePolicy {
    fn from(val: PreflightArg) -> Self {
        match val {
            PreflightArg::All => ProbePolicy::All,
            PreflightArg::Any => ProbePolicy::Any,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let (mut config, source) = ReconConfig::load(cli.config.as_deref())?;
    debug!(?source, "configuration loaded");

    let (mode, target, args) = match cli.command {
        Command::Domain { domain, run } => (InputMode::Domain, domain, run),
        Command::Ip { file, run } => {
            (InputMode::IpFile, file.display().to_string(), run)
        }
        Command::Nmap { report, run } => {
            (InputMode::ScanReport, report.display().to_string(), run)
        }
    };
    if let Some(policy) = args.preflight {
        config.probe_policy = policy.into();
    }

    let ctx = RunContext::new(
        mode,
        target,
        args.workspace,
        args.output.into(),
        args.filename,
    )?;
    let options = PipelineOptions {
        skip_install: args.skip_install,
        skip_credentials: args.skip_credentials,
    };

    let summary = Pipeline::new(&config, &SystemRunner, &TerminalPrompt)
        .with_options(options)
        .run(&ctx)
        .await?;
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    info!(run_id = %summary.run_id, "Run finished");
    println!(
        "Recon complete: {} address(es) scanned, report written to {}",
        summary.addresses.len(),
        summary.report.display()
    );
    if let Some(dir) = &summary.fingerprint_dir {
        println!("Screenshots written to {}", dir.display());
    }
    if !summary.installed.installed.is_empty() {
        println!("Installed modules: {}", summary.installed.installed.join(", "));
    }
    if !summary.cleanup.is_clean() {
        let paths: Vec<String> = summary
            .cleanup
            .failed
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("Remove manually: {}", paths.join(", "));
    }
}

//! Automated reconnaissance pipeline.
//!
//! Drives recon-ng for passive discovery and nmap (optionally EyeWitness) for
//! active scanning, merges both into one recon-ng workspace and renders a
//! normalized report. Every external tool is reached through
//! [`process::ProcessRunner`], so the orchestration can be exercised without
//! spawning anything.

pub mod artifacts;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod prompt;
pub mod stages;
pub mod tools;

pub use config::{ConfigSource, ProbePolicy, ReconConfig};
pub use context::{InputMode, OutputFormat, RunContext};
pub use error::{ReconError, Result, Stage};
pub use pipeline::{Pipeline, PipelineOptions, RunSummary};
pub use process::{CommandOutput, CommandSpec, ProcessRunner, SystemRunner};
pub use prompt::{NoPrompt, SecretPrompt};

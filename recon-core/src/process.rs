//! External process seam.
//!
//! Stage code builds [`CommandSpec`] values and hands them to a
//! [`ProcessRunner`]; only [`SystemRunner`] ever spawns a real process, so the
//! whole pipeline can be driven by a test double.

use std::{fmt::Display, process::Stdio, time::Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{ReconError, Result, Stage};

/// Abstract command representation so we can test without spawning processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments, passed without a shell.
    pub args: Vec<String>,
    /// Arguments carry a secret and must never be rendered in logs.
    pub sensitive: bool,
}

/// Display raw command string
impl Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.sensitive {
            write!(f, "CMD:`{} <redacted>`", self.program)
        } else {
            write!(f, "CMD:`{} {}`", self.program, self.args.join(" "))
        }
    }
}

impl CommandSpec {
    /// Command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            sensitive: false,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Mark the arguments as secret.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Build the tokio command with piped output.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero.
    pub success: bool,
    /// Exit code; `None` when killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Successful exit with `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed exit with `code` and `stderr`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Short failure description: exit status plus the last stderr line.
    pub fn failure_detail(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        let tail = self
            .stderr
            .lines()
            .rev()
            .chain(self.stdout.lines().rev())
            .map(str::trim)
            .find(|line| !line.is_empty());
        match tail {
            Some(line) => format!("{status}: {line}"),
            None => status,
        }
    }
}

/// Executes external commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `spec` to completion with stdout and stderr captured.
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// Spawns real processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        let output = spec.to_command().output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run `spec` for `stage`, turning spawn errors and non-zero exits into
/// [`ReconError::Invocation`].
pub async fn invoke(
    runner: &dyn ProcessRunner,
    stage: Stage,
    spec: &CommandSpec,
) -> Result<CommandOutput> {
    debug!(%stage, "{}", spec);
    let started = Instant::now();
    let output =
        runner
            .run(spec)
            .await
            .map_err(|err| ReconError::Invocation {
                stage,
                program: spec.program.clone(),
                detail: format!("failed to run: {err}"),
            })?;
    trace!(
        %stage,
        elapsed = %humantime::format_duration(started.elapsed()),
        stdout = %output.stdout,
        stderr = %output.stderr,
        "{} finished",
        spec.program
    );
    if !output.success {
        return Err(ReconError::Invocation {
            stage,
            program: spec.program.clone(),
            detail: output.failure_detail(),
        });
    }
    Ok(output)
}

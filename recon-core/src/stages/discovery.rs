//! Passive discovery runner.

use std::time::Instant;

use tracing::info;

use crate::{
    error::{Result, Stage},
    process::{ProcessRunner, invoke},
    tools::{ModuleSpec, engine},
};

/// Run every module of `plan` in order against `workspace`.
///
/// Fail-fast: the first failing module aborts the run and later modules are
/// never attempted. Module output stays captured; results land in the
/// workspace.
pub async fn run_discovery(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    workspace: &str,
    plan: &[ModuleSpec],
) -> Result<usize> {
    for (idx, module) in plan.iter().enumerate() {
        info!(
            module = %module.id,
            "Running discovery module {}/{}",
            idx + 1,
            plan.len()
        );
        let started = Instant::now();
        let spec = engine::run_module_spec(engine_bin, workspace, module);
        invoke(runner, Stage::Discovery, &spec).await?;
        info!(
            module = %module.id,
            elapsed = %humantime::format_duration(started.elapsed()),
            "Module finished"
        );
    }
    Ok(plan.len())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        context::InputMode,
        error::ReconError,
        process::{CommandOutput, MockProcessRunner},
        tools::discovery_plan,
    };

    #[tokio::test]
    async fn runs_modules_in_plan_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let log = calls.clone();
        let mut runner = MockProcessRunner::new();
        runner.expect_run().returning(move |spec| {
            log.lock().unwrap().push(spec.args[3].clone());
            Ok(CommandOutput::ok(""))
        });

        let plan = discovery_plan(InputMode::Domain, Some("example.com"));
        let ran = run_discovery(&runner, "recon-cli", "ws", &plan).await.unwrap();
        assert_eq!(ran, plan.len());
        let expected: Vec<String> = plan.iter().map(|m| m.id.clone()).collect();
        assert_eq!(*calls.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn first_failure_stops_remaining_modules() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|spec| spec.args[3] == "recon/domains-hosts/google_site_web")
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        runner
            .expect_run()
            .withf(|spec| spec.args[3] == "recon/domains-hosts/hackertarget")
            .times(1)
            .returning(|_| Ok(CommandOutput::failed(1, "API limit reached")));
        runner
            .expect_run()
            .withf(|spec| {
                spec.args[3] != "recon/domains-hosts/google_site_web"
                    && spec.args[3] != "recon/domains-hosts/hackertarget"
            })
            .never();

        let plan = discovery_plan(InputMode::Domain, Some("example.com"));
        let err = run_discovery(&runner, "recon-cli", "ws", &plan)
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::Invocation { stage: Stage::Discovery, .. }));
        assert!(err.to_string().contains("API limit reached"));
    }

    #[tokio::test]
    async fn empty_plan_is_a_no_op() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();
        assert_eq!(run_discovery(&runner, "recon-cli", "ws", &[]).await.unwrap(), 0);
    }
}

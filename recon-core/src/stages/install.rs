//! Capability installer: makes sure every engine module the run depends on is
//! present, installing missing ones from the marketplace.
//!
//! Best-effort: failures are logged and the module invocation that actually
//! needs the missing module reports the real error later.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::{
    error::Stage,
    process::{ProcessRunner, invoke},
    tools::engine,
};

/// Modules the installer touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Installed successfully.
    pub installed: Vec<String>,
    /// Install attempted and failed.
    pub failed: Vec<String>,
}

/// Identifiers in a module listing, one token per registered module path.
fn registered_modules(listing: &str) -> HashSet<&str> {
    listing
        .split_whitespace()
        .filter(|token| token.contains('/'))
        .collect()
}

/// Install every module in `required` missing from the engine listing.
///
/// Never fails; problems are logged.
pub async fn ensure_modules(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    required: &[&str],
) -> InstallOutcome {
    let mut outcome = InstallOutcome::default();

    let listing = match invoke(
        runner,
        Stage::Install,
        &engine::list_modules_spec(engine_bin),
    )
    .await
    {
        Ok(out) => out.stdout,
        Err(err) => {
            warn!("Could not list installed modules ({err}); skipping installation");
            return outcome;
        }
    };
    let present = registered_modules(&listing);

    for module in required.iter().filter(|m| !present.contains(**m)) {
        info!("Could not find module {module}, installing now..");
        let spec = engine::install_module_spec(engine_bin, module);
        match invoke(runner, Stage::Install, &spec).await {
            Ok(_) => outcome.installed.push(module.to_string()),
            Err(err) => {
                warn!("Installing {module} failed: {err}");
                outcome.failed.push(module.to_string());
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::process::{CommandOutput, CommandSpec, MockProcessRunner};

    const LISTING: &str = "
  Discovery
  ---------
    import/nmap
    recon/domains-hosts/hackertarget
    reporting/csv
";

    fn is_listing(spec: &CommandSpec) -> bool {
        spec.args == ["-M"]
    }

    #[tokio::test]
    async fn installs_only_missing_modules() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(is_listing)
            .times(1)
            .returning(|_| Ok(CommandOutput::ok(LISTING)));
        runner
            .expect_run()
            .with(eq(engine::install_module_spec(
                "recon-cli",
                "reporting/json",
            )))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let outcome = ensure_modules(
            &runner,
            "recon-cli",
            &["import/nmap", "reporting/csv", "reporting/json"],
        )
        .await;
        assert_eq!(outcome.installed, ["reporting/json"]);
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn prefix_of_a_listed_module_is_not_enough() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(is_listing)
            .returning(|_| Ok(CommandOutput::ok("import/nmap_xml\n")));
        runner
            .expect_run()
            .withf(|spec| {
                spec.args.get(1).is_some_and(|a| a == "marketplace install import/nmap")
            })
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let outcome = ensure_modules(&runner, "recon-cli", &["import/nmap"]).await;
        assert_eq!(outcome.installed, ["import/nmap"]);
    }

    #[tokio::test]
    async fn install_failures_are_not_fatal() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(is_listing)
            .returning(|_| Ok(CommandOutput::ok("")));
        runner
            .expect_run()
            .withf(|spec| !is_listing(spec))
            .times(2)
            .returning(|_| Ok(CommandOutput::failed(1, "marketplace unreachable")));

        let outcome =
            ensure_modules(&runner, "recon-cli", &["import/nmap", "reporting/csv"]).await;
        assert!(outcome.installed.is_empty());
        assert_eq!(outcome.failed, ["import/nmap", "reporting/csv"]);
    }

    #[tokio::test]
    async fn second_run_only_lists() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("import/nmap\nreporting/csv\n")));
        let outcome =
            ensure_modules(&runner, "recon-cli", &["import/nmap", "reporting/csv"]).await;
        assert_eq!(outcome, InstallOutcome::default());
    }
}

//! Report emitter.

use std::path::Path;

use tracing::info;

use crate::{
    context::OutputFormat,
    error::{ReconError, Result, Stage},
    process::{ProcessRunner, invoke},
    tools::engine,
};

/// Render the ports table of `workspace` to `destination` in `format`.
///
/// A failed run may leave a partial file behind; it is not removed.
pub async fn emit_report(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    workspace: &str,
    format: OutputFormat,
    destination: &Path,
) -> Result<()> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| ReconError::io(Stage::Report, parent, err))?;
    }

    info!(
        "Normalizing results and outputting to {}",
        format.extension()
    );
    let module = engine::report_module(format, destination);
    let spec = engine::run_module_spec(engine_bin, workspace, &module);
    invoke(runner, Stage::Report, &spec).await?;
    info!("Results written to {}", destination.display());
    Ok(())
}

//! Address extractor: pulls discovered IPv4 addresses out of the workspace and
//! materializes them as the active-scan input list.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::{
    error::{ReconError, Result, Stage},
    process::{ProcessRunner, invoke},
    tools::engine,
};

// Shape only: octet ranges are not checked.
static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}")
        .expect("dotted quad pattern is valid")
});

/// Dotted-quad tokens in first-appearance order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList {
    entries: Vec<String>,
}

impl AddressList {
    /// Every dotted-quad substring of `text`, tolerating any surrounding
    /// table borders or whitespace.
    pub fn scan(text: &str) -> Self {
        Self {
            entries: DOTTED_QUAD
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }

    /// Addresses in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of addresses, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no address was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One address per line, each newline-terminated; empty for no addresses.
    pub fn render(&self) -> String {
        self.entries.iter().map(|ip| format!("{ip}\n")).collect()
    }

    /// Write [`Self::render`] to `path`, replacing it.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.render())
            .await
            .map_err(|err| ReconError::io(Stage::Extract, path, err))
    }
}

/// Query `hosts.ip_address` and write the matches to `destination`.
pub async fn extract_addresses(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    workspace: &str,
    destination: &Path,
) -> Result<AddressList> {
    let spec = engine::db_query_spec(engine_bin, workspace, engine::ADDRESS_QUERY);
    let output = invoke(runner, Stage::Extract, &spec).await?;
    let addresses = AddressList::scan(&output.stdout);
    addresses.write_to(destination).await?;
    info!(
        count = addresses.len(),
        path = %destination.display(),
        "Address list written"
    );
    Ok(addresses)
}

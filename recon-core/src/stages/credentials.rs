//! Credential provisioner for the third-party API key discovery modules need.

use std::env;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::{
    config::CredentialConfig,
    error::Stage,
    process::{ProcessRunner, invoke},
    prompt::SecretPrompt,
    tools::engine,
};

/// What the provisioner did about the API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOutcome {
    /// The engine already had a value; nothing was registered.
    AlreadyRegistered,
    /// Registered from the configured environment variable.
    RegisteredFromEnv,
    /// Registered from operator input.
    RegisteredFromPrompt,
    /// Nothing registered; modules needing the key will fail on their own.
    Skipped,
}

// One `| name | value |` row of the `keys list` table.
static KEY_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\|\s*([^\s|]+)\s*\|\s*([^|]*?)\s*\|")
        .expect("key row pattern is valid")
});

/// `true` when the `keys list` table has a row named exactly `name` with a
/// non-empty value.
pub fn key_registered(listing: &str, name: &str) -> bool {
    KEY_ROW.captures_iter(listing).any(|row| {
        row.get(1).is_some_and(|cell| cell.as_str() == name)
            && row.get(2).is_some_and(|value| !value.as_str().is_empty())
    })
}

/// Make sure the engine holds the configured API key.
///
/// Checks `keys list` first; a missing key is taken from the configured
/// environment variable or, failing that, from `prompt`. Every problem is
/// logged and reported as [`CredentialOutcome::Skipped`].
pub async fn ensure_credential(
    runner: &dyn ProcessRunner,
    engine_bin: &str,
    credential: &CredentialConfig,
    prompt: &dyn SecretPrompt,
) -> CredentialOutcome {
    let name = credential.name.as_str();
    match invoke(runner, Stage::Credentials, &engine::list_keys_spec(engine_bin))
        .await
    {
        Ok(out) if key_registered(&out.stdout, name) => {
            return CredentialOutcome::AlreadyRegistered;
        }
        Ok(_) => {}
        Err(err) => warn!("Could not list registered keys: {err}"),
    }

    let from_env = credential
        .env_var
        .as_deref()
        .and_then(|var| env::var(var).ok())
        .map(Zeroizing::new)
        .filter(|value| !value.trim().is_empty());

    let (value, outcome) = match from_env {
        Some(value) => (value, CredentialOutcome::RegisteredFromEnv),
        None => {
            let question = format!(
                "API key for {name} not found. Please enter it now"
            );
            match prompt.read_secret(&question) {
                Ok(value) if !value.trim().is_empty() => {
                    (value, CredentialOutcome::RegisteredFromPrompt)
                }
                Ok(_) => {
                    warn!("No value entered for {name}; continuing without it");
                    return CredentialOutcome::Skipped;
                }
                Err(err) => {
                    warn!("{err}; continuing without {name}");
                    return CredentialOutcome::Skipped;
                }
            }
        }
    };

    info!("Adding key {name}..");
    let spec = engine::add_key_spec(engine_bin, name, value.trim());
    if let Err(err) = invoke(runner, Stage::Credentials, &spec).await {
        warn!("Registering {name} failed: {err}");
        return CredentialOutcome::Skipped;
    }
    outcome
}

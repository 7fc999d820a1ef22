//! Terminal-backed secret prompt.

use dialoguer::{Password, console::Term};
use recon_core::{ReconError, SecretPrompt};
use zeroize::Zeroizing;

/// Reads secrets from the controlling terminal without echo.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&self, prompt: &str) -> recon_core::Result<Zeroizing<String>> {
        let term = Term::stderr();
        if !term.is_term() {
            return Err(ReconError::Prompt("stderr is not a terminal".into()));
        }
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact_on(&term)
            .map(Zeroizing::new)
            .map_err(|err| ReconError::Prompt(err.to_string()))
    }
}

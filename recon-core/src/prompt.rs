//! Operator prompts for secrets.

use zeroize::Zeroizing;

use crate::error::Result;

/// Operator input that must not be echoed (API keys).
#[cfg_attr(test, mockall::automock)]
pub trait SecretPrompt: Send + Sync {
    /// Ask for a secret with `prompt`, without echo.
    fn read_secret(&self, prompt: &str) -> Result<Zeroizing<String>>;
}

/// Prompt for runs without a terminal: always fails, so provisioning is
/// skipped with a warning instead of blocking on stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl SecretPrompt for NoPrompt {
    fn read_secret(&self, _prompt: &str) -> Result<Zeroizing<String>> {
        Err(crate::error::ReconError::Prompt(
            "no interactive terminal available".into(),
        ))
    }
}

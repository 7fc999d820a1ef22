//! Pipeline components, one module per stage.

pub mod cleanup;
pub mod credentials;
pub mod discovery;
pub mod extract;
pub mod import;
pub mod ingest;
pub mod install;
pub mod preflight;
pub mod report;
pub mod scan;

pub use cleanup::{CleanupReport, cleanup};
pub use credentials::{CredentialOutcome, ensure_credential};
pub use discovery::run_discovery;
pub use extract::{AddressList, extract_addresses};
pub use import::import_scan_report;
pub use ingest::{Ingested, ingest};
pub use install::{InstallOutcome, ensure_modules};
pub use preflight::{EnvironmentProber, ProbeReport, required_tools};
pub use report::emit_report;
pub use scan::{run_active_scan, run_fingerprint};

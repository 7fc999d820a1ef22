//! Typed invocations of the external collaborators.
//!
//! Each builder returns a [`CommandSpec`](crate::process::CommandSpec); the
//! option keys an engine module accepts are enumerated by [`ModuleOption`]
//! instead of being assembled as ad hoc strings.

pub mod engine;
pub mod scanner;

use std::path::PathBuf;

use crate::context::InputMode;

/// Engine module option keys used by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOption {
    /// Seed value for discovery modules (the domain).
    Source(String),
    /// Input or output file.
    Filename(PathBuf),
    /// Single table.
    Table(String),
    /// Column of [`ModuleOption::Table`].
    Column(String),
    /// Tables included by the json/xlsx reporting modules.
    Tables(Vec<String>),
    /// Whether the csv report writes a header row.
    Headers(bool),
}

impl ModuleOption {
    /// Option name as the engine expects it.
    pub fn key(&self) -> &'static str {
        match self {
            ModuleOption::Source(_) => "SOURCE",
            ModuleOption::Filename(_) => "FILENAME",
            ModuleOption::Table(_) => "TABLE",
            ModuleOption::Column(_) => "COLUMN",
            ModuleOption::Tables(_) => "TABLES",
            ModuleOption::Headers(_) => "HEADERS",
        }
    }

    /// `KEY=VALUE` as passed after `-o`.
    pub fn render(&self) -> String {
        let value = match self {
            ModuleOption::Source(v)
            | ModuleOption::Table(v)
            | ModuleOption::Column(v) => v.clone(),
            ModuleOption::Filename(path) => path.display().to_string(),
            ModuleOption::Tables(tables) => tables.join(","),
            ModuleOption::Headers(true) => "True".to_string(),
            ModuleOption::Headers(false) => "False".to_string(),
        };
        format!("{}={}", self.key(), value)
    }
}

/// One engine module invocation: identifier plus its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    /// Module path, e.g. `recon/hosts-hosts/resolve`.
    pub id: String,
    /// Options set before the module runs.
    pub options: Vec<ModuleOption>,
}

impl ModuleSpec {
    /// Module without options.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: Vec::new(),
        }
    }

    /// Add an option.
    pub fn with(mut self, option: ModuleOption) -> Self {
        self.options.push(option);
        self
    }
}

/// Imports an nmap XML report.
pub const IMPORT_NMAP: &str = "import/nmap";
/// Imports a newline-delimited list into a table column.
pub const IMPORT_LIST: &str = "import/list";

const DOMAIN_DISCOVERY: &[&str] = &[
    "recon/domains-hosts/google_site_web",
    "recon/domains-hosts/hackertarget",
    "recon/domains-hosts/shodan_hostname",
    "recon/hosts-hosts/resolve",
    "recon/hosts-ports/shodan_ip",
    "recon/netblocks-hosts/shodan_net",
];

const HOST_DISCOVERY: &[&str] = &[
    "recon/hosts-hosts/reverse_resolve",
    "recon/hosts-ports/shodan_ip",
];

const REPORTING: &[&str] = &["reporting/csv", "reporting/json", "reporting/xlsx"];

/// Ordered discovery plan for `mode`; `domain` is attached as `SOURCE` to
/// every module in domain mode.
pub fn discovery_plan(mode: InputMode, domain: Option<&str>) -> Vec<ModuleSpec> {
    let ids = match mode {
        InputMode::Domain => DOMAIN_DISCOVERY,
        InputMode::IpFile | InputMode::ScanReport => HOST_DISCOVERY,
    };
    ids.iter()
        .map(|id| {
            let spec = ModuleSpec::new(*id);
            match domain {
                Some(domain) => {
                    spec.with(ModuleOption::Source(domain.to_string()))
                }
                None => spec,
            }
        })
        .collect()
}

/// Every module identifier the run depends on, discovery and reporting alike.
pub fn required_modules(mode: InputMode) -> Vec<&'static str> {
    let mut modules = vec![IMPORT_NMAP];
    match mode {
        InputMode::Domain => modules.extend(DOMAIN_DISCOVERY),
        InputMode::IpFile | InputMode::ScanReport => {
            modules.push(IMPORT_LIST);
            modules.extend(HOST_DISCOVERY);
        }
    }
    modules.extend(REPORTING);
    modules
}

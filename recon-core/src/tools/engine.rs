//! recon-ng (`recon-cli`) invocations.

use std::path::Path;

use crate::{
    context::OutputFormat,
    process::CommandSpec,
    tools::{IMPORT_LIST, IMPORT_NMAP, ModuleOption, ModuleSpec},
};

/// Table the active-scan import populates and the report is rendered from.
pub const PORTS_TABLE: &str = "ports";

/// Query whose output the address extractor scans.
pub const ADDRESS_QUERY: &str = "select ip_address from hosts";

/// `recon-cli -w <ws> -m <module> [-o KEY=VALUE ...] -x`
pub fn run_module_spec(
    engine: &str,
    workspace: &str,
    module: &ModuleSpec,
) -> CommandSpec {
    let mut spec = CommandSpec::new(engine).args(["-w", workspace, "-m"]);
    spec = spec.arg(module.id.as_str());
    for option in &module.options {
        spec = spec.arg("-o").arg(option.render());
    }
    spec.arg("-x")
}

/// `recon-cli -M`
pub fn list_modules_spec(engine: &str) -> CommandSpec {
    CommandSpec::new(engine).arg("-M")
}

/// `recon-cli -C "marketplace install <module>"`
pub fn install_module_spec(engine: &str, module_id: &str) -> CommandSpec {
    CommandSpec::new(engine)
        .arg("-C")
        .arg(format!("marketplace install {module_id}"))
}

/// `recon-cli -C "keys list"`
pub fn list_keys_spec(engine: &str) -> CommandSpec {
    CommandSpec::new(engine).args(["-C", "keys list"])
}

/// `recon-cli -C "keys add <name> <value>"`, redacted in logs.
pub fn add_key_spec(engine: &str, name: &str, value: &str) -> CommandSpec {
    CommandSpec::new(engine)
        .arg("-C")
        .arg(format!("keys add {name} {value}"))
        .sensitive()
}

/// `recon-cli -w <ws> -C "db query <sql>"`
pub fn db_query_spec(engine: &str, workspace: &str, sql: &str) -> CommandSpec {
    CommandSpec::new(engine)
        .args(["-w", workspace, "-C"])
        .arg(format!("db query {sql}"))
}

/// Merges an nmap XML report into the workspace.
pub fn import_scan_module(report: &Path) -> ModuleSpec {
    ModuleSpec::new(IMPORT_NMAP).with(ModuleOption::Filename(report.into()))
}

/// Maps every line of `list` into `hosts.ip_address`.
pub fn import_list_module(list: &Path) -> ModuleSpec {
    ModuleSpec::new(IMPORT_LIST)
        .with(ModuleOption::Filename(list.into()))
        .with(ModuleOption::Table("hosts".into()))
        .with(ModuleOption::Column("ip_address".into()))
}

/// Reporting module for `format`, rendering the ports table with headers.
pub fn report_module(format: OutputFormat, destination: &Path) -> ModuleSpec {
    let spec = ModuleSpec::new(format.module_id())
        .with(ModuleOption::Filename(destination.into()));
    match format {
        OutputFormat::Csv => spec
            .with(ModuleOption::Table(PORTS_TABLE.into()))
            .with(ModuleOption::Headers(true)),
        OutputFormat::Json | OutputFormat::Spreadsheet => {
            spec.with(ModuleOption::Tables(vec![PORTS_TABLE.into()]))
        }
    }
}

use super::CliError;
use anyhow::Context;
use gp3m2_core::domain::{SimError, SimResult};
use gp3m2_core::run::RunReport;
use gp3m2_core::script::Session;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub(super) const INIT_MACRO: &str = "init.mac";
pub(super) const INIT_VIS_MACRO: &str = "init_vis.mac";

pub(super) fn current_working_dir() -> SimResult<PathBuf> {
    std::env::current_dir().map_err(|source| {
        SimError::io_system(
            "IO.CLI_CURRENT_DIR",
            format!("failed to read current working directory: {}", source),
        )
    })
}

/// Startup macros are optional: a missing file is skipped, a failing one is
/// reported without aborting the session.
pub(super) fn execute_startup_macro(session: &mut Session, working_dir: &Path, name: &str) {
    let path = working_dir.join(name);
    if !path.is_file() {
        debug!(macro_file = name, "startup macro not present, skipping");
        return;
    }
    if let Err(error) = session.execute_macro_file(&path) {
        eprintln!("{}", error.diagnostic_line());
    }
}

pub(super) fn write_run_report(
    report: Option<&RunReport>,
    path: &Path,
) -> Result<(), CliError> {
    let report = report.ok_or_else(|| {
        CliError::Sim(SimError::input_validation(
            "INPUT.NO_RUN_REPORT",
            "no run was executed, nothing to report; the macro needs a /run/beamOn",
        ))
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory '{}'", parent.display()))?;
    }

    let rendered = serde_json::to_string_pretty(report)
        .context("failed to serialize run report")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write run report '{}'", path.display()))?;
    Ok(())
}

pub(super) fn render_run_summary(report: &RunReport) -> String {
    let mut summary = format!(
        "Run complete: {} events from {} macro-particles\n",
        report.events, report.macro_particles
    );
    summary.push_str(&format!(
        "  electron rows: {}\n  gamma rows:    {}\n  positron rows: {}\n",
        report.diagnostics.electron_rows,
        report.diagnostics.gamma_rows,
        report.diagnostics.positron_rows
    ));
    summary.push_str("  output files:\n");
    for file in &report.diagnostics.files {
        summary.push_str(&format!("    {}\n", file.display()));
    }
    summary.trim_end().to_string()
}

use super::CliError;
use super::helpers::{self, INIT_MACRO, INIT_VIS_MACRO};
use anyhow::Context;
use gp3m2_core::script::Session;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct MacroArgs {
    /// Macro file to execute
    pub(super) file: PathBuf,

    /// Write the final run report as JSON
    #[arg(long)]
    pub(super) report: Option<PathBuf>,
}

pub(super) fn run_interactive_command(with_vis: bool) -> Result<i32, CliError> {
    let working_dir = helpers::current_working_dir().map_err(CliError::Sim)?;
    let mut session = Session::new(&working_dir);

    helpers::execute_startup_macro(&mut session, &working_dir, INIT_MACRO);
    if with_vis {
        helpers::execute_startup_macro(&mut session, &working_dir, INIT_VIS_MACRO);
    }

    let stdin = io::stdin();
    run_session_loop(&mut session, stdin.lock(), io::stdout())
}

/// Interactive command loop: one macro command per line, `exit` leaves.
/// Command failures are reported and the session keeps going, the same way
/// the toolkit's UI session behaves.
pub(super) fn run_session_loop(
    session: &mut Session,
    reader: impl BufRead,
    mut writer: impl Write,
) -> Result<i32, CliError> {
    for line in reader.lines() {
        let line = line.context("failed to read interactive command")?;
        if line.trim() == "exit" {
            break;
        }
        if let Err(error) = session.execute_line(&line) {
            writeln!(writer, "{}", error.diagnostic_line())
                .context("failed to write interactive diagnostics")?;
        }
    }
    Ok(0)
}

pub(super) fn run_macro_command(args: MacroArgs) -> Result<i32, CliError> {
    let working_dir = helpers::current_working_dir().map_err(CliError::Sim)?;
    let mut session = Session::new(&working_dir);

    session
        .execute_macro_file(&args.file)
        .map_err(CliError::Sim)?;

    if let Some(report_path) = &args.report {
        helpers::write_run_report(session.last_report(), report_path)?;
    }
    if let Some(report) = session.last_report() {
        println!("{}", helpers::render_run_summary(report));
    }
    Ok(0)
}

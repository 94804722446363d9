mod commands;
mod helpers;

use clap::Parser;
use gp3m2_core::domain::SimError;

pub fn run_from_env() -> i32 {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(CliError::Usage(message)) => {
            eprintln!("{}", message);
            eprintln!();
            eprintln!("{}", usage_text());
            1
        }
        Err(error) => {
            let sim_error = error.as_sim_error();
            eprintln!("{}", sim_error.diagnostic_line());
            sim_error.exit_code()
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "gp3m2", about = "Phase-space driven layered-target transport application")]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Start an interactive macro session (default)
    Interactive,
    /// Start an interactive session with the visualization macros loaded
    Vis,
    /// Execute a macro file in batch mode
    Macro(commands::MacroArgs),
}

fn dispatch_parsed(command: Option<CliCommand>) -> Result<i32, CliError> {
    match command.unwrap_or(CliCommand::Interactive) {
        CliCommand::Interactive => commands::run_interactive_command(false),
        CliCommand::Vis => commands::run_interactive_command(true),
        CliCommand::Macro(args) => commands::run_macro_command(args),
    }
}

fn usage_text() -> &'static str {
    "Usage:
  gp3m2                 launch the application in interactive mode (default)
  gp3m2 vis             launch the application with the visualization macros
  gp3m2 macro <file>    execute the macro file <file>"
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Sim(SimError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_sim_error(&self) -> SimError {
        match self {
            Self::Usage(message) => SimError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Sim(error) => error.clone(),
            Self::Internal(error) => SimError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

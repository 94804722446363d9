//! Macro command interpreter.
//!
//! The application is configured through line-oriented macro commands, the
//! same surface the original exposed through its UI messengers:
//!
//! ```text
//! /units/setPositionUnit um
//! /run/initialize
//! /target/addLayer G4_Al 100
//! /input/setFileName input.dat
//! /diags/setLowEnergyLimit 0.1 MeV
//! /run/beamOn 100000
//! ```
//!
//! Commands are gated on a two-state application lifecycle: unit commands
//! are only accepted before `/run/initialize` (PreInit), everything else
//! only after it (Idle). `/vis/` commands are skipped so toolkit
//! visualization macros stay loadable.

use crate::biasing::BiasingConfig;
use crate::diagnostics::DiagnosticsConfig;
use crate::domain::{SimError, SimResult};
use crate::geometry::{DetectorSetup, TargetStack};
use crate::input::PhaseSpaceFile;
use crate::physics::PhysicsSettings;
use crate::run::{self, RunReport, RunSetup, TransportEngine, engine_unavailable_error};
use crate::source::PrimarySource;
use crate::units::{MomentumUnit, UnitSystem};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Nested `/control/execute` depth limit.
pub const MAX_MACRO_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    PreInit,
    Idle,
}

impl AppState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreInit => "PreInit",
            Self::Idle => "Idle",
        }
    }
}

/// One configured application instance: interprets macro commands, carries
/// the accumulated configuration, and drives runs through the engine seam.
pub struct Session {
    state: AppState,
    units: UnitSystem,
    target: TargetStack,
    physics: PhysicsSettings,
    diagnostics: DiagnosticsConfig,
    biasing: BiasingConfig,
    input_file: Option<PathBuf>,
    working_dir: PathBuf,
    engine: Option<Box<dyn TransportEngine>>,
    last_report: Option<RunReport>,
}

impl Session {
    /// A fresh PreInit session. Relative macro, input, and output paths
    /// resolve against `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: AppState::PreInit,
            units: UnitSystem::default(),
            target: TargetStack::new(),
            physics: PhysicsSettings::default(),
            diagnostics: DiagnosticsConfig::default(),
            biasing: BiasingConfig::default(),
            input_file: None,
            working_dir: working_dir.into(),
            engine: None,
            last_report: None,
        }
    }

    /// Attaches a transport backend. Without one, `/run/beamOn` fails with
    /// `RUN.ENGINE_UNAVAILABLE`.
    pub fn with_engine(mut self, engine: Box<dyn TransportEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn units(&self) -> &UnitSystem {
        &self.units
    }

    pub fn target(&self) -> &TargetStack {
        &self.target
    }

    pub fn physics(&self) -> &PhysicsSettings {
        &self.physics
    }

    pub fn input_file(&self) -> Option<&Path> {
        self.input_file.as_deref()
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    pub fn execute_line(&mut self, line: &str) -> SimResult<()> {
        self.execute_line_at_depth(line, 0)
    }

    pub fn execute_macro_file(&mut self, path: &Path) -> SimResult<()> {
        self.execute_file_at_depth(path, 0)
    }

    fn execute_file_at_depth(&mut self, path: &Path, depth: usize) -> SimResult<()> {
        if depth >= MAX_MACRO_DEPTH {
            return Err(SimError::input_validation(
                "INPUT.MACRO_DEPTH",
                format!(
                    "macro nesting deeper than {} levels at '{}'",
                    MAX_MACRO_DEPTH,
                    path.display()
                ),
            ));
        }

        let resolved = self.resolve_path(path);
        let source = fs::read_to_string(&resolved).map_err(|source| {
            SimError::io_system(
                "IO.MACRO_READ",
                format!("failed to read macro file '{}': {}", resolved.display(), source),
            )
        })?;

        info!(macro_file = %resolved.display(), "executing macro");
        for (index, line) in source.lines().enumerate() {
            self.execute_line_at_depth(line, depth).map_err(|error| {
                SimError::new(
                    error.category(),
                    error.code(),
                    format!("{}:{}: {}", resolved.display(), index + 1, error.message()),
                )
            })?;
        }
        Ok(())
    }

    fn execute_line_at_depth(&mut self, line: &str, depth: usize) -> SimResult<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let (command, args) = tokens.split_first().expect("non-empty line has tokens");

        match *command {
            "/control/execute" => {
                let &[macro_path] = args else {
                    return Err(args_error(command, "<macroFile>"));
                };
                self.execute_file_at_depth(Path::new(macro_path), depth + 1)
            }

            "/units/setPositionUnit" => {
                self.require_state(command, AppState::PreInit)?;
                let &[label] = args else {
                    return Err(args_error(command, "<unit>"));
                };
                self.units.set_position_unit(label).map_err(unit_error)
            }
            "/units/setMomentumUnit" => {
                self.require_state(command, AppState::PreInit)?;
                let &[label] = args else {
                    return Err(args_error(command, "<unit>"));
                };
                self.units.set_momentum_unit(label).map_err(unit_error)
            }
            "/units/setTimeUnit" => {
                self.require_state(command, AppState::PreInit)?;
                let &[label] = args else {
                    return Err(args_error(command, "<unit>"));
                };
                self.units.set_time_unit(label).map_err(unit_error)
            }

            "/run/initialize" => {
                self.require_state(command, AppState::PreInit)?;
                self.state = AppState::Idle;
                info!(
                    position_unit = self.units.position.label(),
                    momentum_unit = self.units.momentum.label(),
                    time_unit = self.units.time.label(),
                    "initialized; units frozen"
                );
                Ok(())
            }

            "/run/beamOn" => {
                self.require_state(command, AppState::Idle)?;
                let &[count] = args else {
                    return Err(args_error(command, "<nEvents>"));
                };
                let n_events: usize = count.parse().map_err(|_| {
                    args_error(command, "<nEvents> (a non-negative integer)")
                })?;
                self.beam_on(n_events)
            }

            "/target/addLayer" => {
                self.require_state(command, AppState::Idle)?;
                let &[material, width] = args else {
                    return Err(args_error(command, "<material> <width_um>"));
                };
                let width_um = parse_f64(command, width)?;
                self.target.add_layer(material, width_um)
            }

            "/input/setFileName" => {
                self.require_state(command, AppState::Idle)?;
                let &[file_name] = args else {
                    return Err(args_error(command, "<fileName>"));
                };
                self.input_file = Some(PathBuf::from(file_name));
                Ok(())
            }

            "/diags/setFileBaseName" => {
                self.require_state(command, AppState::Idle)?;
                let &[base_name] = args else {
                    return Err(args_error(command, "<baseName>"));
                };
                self.diagnostics.set_output_base(base_name)
            }

            "/diags/setLowEnergyLimit" => {
                self.require_state(command, AppState::Idle)?;
                let (value, unit) = match args {
                    &[value] => (value, MomentumUnit::Mev),
                    &[value, label] => {
                        (value, MomentumUnit::from_label(label).map_err(unit_error)?)
                    }
                    _ => return Err(args_error(command, "<value> [unit]")),
                };
                let limit = parse_f64(command, value)? * unit.value();
                self.diagnostics.set_low_energy_limit(limit)
            }

            "/physics/setPhysicsList" => {
                self.require_state(command, AppState::Idle)?;
                let &[name] = args else {
                    return Err(args_error(command, "<name>"));
                };
                self.physics.select(name)
            }

            command if command.starts_with("/vis/") => {
                // visualization belongs to the external toolkit
                debug!(command, "skipping visualization command");
                Ok(())
            }

            other => Err(SimError::input_validation(
                "INPUT.UNKNOWN_COMMAND",
                format!("unknown command '{}'", other),
            )),
        }
    }

    fn beam_on(&mut self, n_events: usize) -> SimResult<()> {
        let input_file = self.input_file.clone().ok_or_else(|| {
            SimError::input_validation(
                "INPUT.NO_PHASE_SPACE_FILE",
                "no phase-space input file configured; use /input/setFileName",
            )
        })?;

        let input_path = self.resolve_path(&input_file);
        let mut file = PhaseSpaceFile::read(&input_path)?;
        file.normalize_weights(n_events)?;
        let source = PrimarySource::new(file, self.units);

        let setup = RunSetup {
            detector: DetectorSetup::new(self.target.clone()),
            physics: self.physics,
            biasing: self.biasing,
        };

        let output_dir = self.working_dir.clone();
        let engine = self
            .engine
            .as_deref_mut()
            .ok_or_else(engine_unavailable_error)?;

        let report = run::beam_on(
            engine,
            &setup,
            &source,
            &self.diagnostics,
            self.units,
            &output_dir,
            n_events,
        )?;
        self.last_report = Some(report);
        Ok(())
    }

    fn require_state(&self, command: &str, required: AppState) -> SimResult<()> {
        if self.state == required {
            return Ok(());
        }
        Err(SimError::input_validation(
            "INPUT.COMMAND_STATE",
            format!(
                "command '{}' is only available in the {} state (current state: {})",
                command,
                required.label(),
                self.state.label()
            ),
        ))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

fn args_error(command: &str, usage: &str) -> SimError {
    SimError::input_validation(
        "INPUT.COMMAND_ARGS",
        format!("usage: {} {}", command, usage),
    )
}

fn unit_error(error: crate::units::UnitParseError) -> SimError {
    SimError::input_validation("INPUT.UNKNOWN_UNIT", error.to_string())
}

fn parse_f64(command: &str, token: &str) -> SimResult<f64> {
    token.parse::<f64>().map_err(|_| {
        SimError::input_validation(
            "INPUT.COMMAND_ARGS",
            format!("command '{}': '{}' is not a number", command, token),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{AppState, MAX_MACRO_DEPTH, Session};
    use crate::domain::{SimErrorCategory, SimResult, StepPoint, Track};
    use crate::run::{RunSetup, StepObserver, TransportEngine};
    use crate::units::{MomentumUnit, PositionUnit};
    use std::fs;
    use tempfile::TempDir;

    /// Reports one boundary crossing of the primary per event.
    struct EchoEngine;

    impl TransportEngine for EchoEngine {
        fn initialize(&mut self, _setup: &RunSetup) -> SimResult<()> {
            Ok(())
        }

        fn process_event(
            &mut self,
            primary: Track,
            observer: &mut dyn StepObserver,
        ) -> SimResult<()> {
            observer.post_step(&StepPoint {
                kind: primary.kind,
                weight: primary.weight,
                position: primary.position,
                momentum: primary.momentum,
                global_time: primary.global_time,
                kinetic_energy: 1.0,
                at_boundary: true,
            })
        }
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let mut session = Session::new(".");
        session.execute_line("").expect("blank line is a no-op");
        session.execute_line("   ").expect("whitespace line is a no-op");
        session
            .execute_line("# /run/initialize inside a comment")
            .expect("comment is a no-op");
        assert_eq!(session.state(), AppState::PreInit);
    }

    #[test]
    fn unit_commands_are_preinit_only() {
        let mut session = Session::new(".");
        session
            .execute_line("/units/setPositionUnit mm")
            .expect("unit command should work before init");
        assert_eq!(session.units().position, PositionUnit::Mm);

        session.execute_line("/run/initialize").expect("initialize should work");
        assert_eq!(session.state(), AppState::Idle);

        let error = session
            .execute_line("/units/setMomentumUnit GeV")
            .expect_err("units are frozen after initialize");
        assert_eq!(error.code(), "INPUT.COMMAND_STATE");
        assert_eq!(session.units().momentum, MomentumUnit::Mev);
    }

    #[test]
    fn idle_commands_are_rejected_before_initialize() {
        let mut session = Session::new(".");
        for line in [
            "/target/addLayer G4_Al 100",
            "/input/setFileName input.dat",
            "/diags/setFileBaseName out",
            "/physics/setPhysicsList simple",
            "/run/beamOn 10",
        ] {
            let error = session.execute_line(line).expect_err("PreInit should reject");
            assert_eq!(error.code(), "INPUT.COMMAND_STATE", "line: {}", line);
        }
    }

    #[test]
    fn configuration_commands_mutate_the_session() {
        let mut session = Session::new(".");
        session.execute_line("/run/initialize").expect("initialize");
        session
            .execute_line("/target/addLayer G4_Al 100")
            .expect("layer should be added");
        session
            .execute_line("/target/addLayer G4_Cu 50")
            .expect("layer should be added");
        session
            .execute_line("/physics/setPhysicsList standard")
            .expect("list should change");
        session
            .execute_line("/input/setFileName input.dat")
            .expect("input file should be set");
        session
            .execute_line("/diags/setLowEnergyLimit 100 keV")
            .expect("limit with unit should parse");

        assert_eq!(session.target().number_of_layers(), 2);
        assert_eq!(session.physics().list.name(), "standard");
        assert!(session.input_file().is_some());
    }

    #[test]
    fn malformed_commands_report_usage() {
        let mut session = Session::new(".");
        session.execute_line("/run/initialize").expect("initialize");

        let error = session
            .execute_line("/target/addLayer G4_Al")
            .expect_err("missing width");
        assert_eq!(error.code(), "INPUT.COMMAND_ARGS");
        assert!(error.message().contains("usage"));

        let error = session
            .execute_line("/target/addLayer G4_Al thick")
            .expect_err("non-numeric width");
        assert_eq!(error.code(), "INPUT.COMMAND_ARGS");

        let error = session
            .execute_line("/run/beamOn -5")
            .expect_err("negative event count");
        assert_eq!(error.code(), "INPUT.COMMAND_ARGS");
    }

    #[test]
    fn unknown_commands_and_units_are_rejected() {
        let mut session = Session::new(".");
        let error = session
            .execute_line("/bogus/doThing 1")
            .expect_err("unknown command");
        assert_eq!(error.code(), "INPUT.UNKNOWN_COMMAND");

        let error = session
            .execute_line("/units/setPositionUnit parsec")
            .expect_err("unknown unit");
        assert_eq!(error.code(), "INPUT.UNKNOWN_UNIT");
        assert!(error.message().contains("parsec"));
    }

    #[test]
    fn vis_commands_are_skipped() {
        let mut session = Session::new(".");
        session
            .execute_line("/vis/open OGL 600x600-0+0")
            .expect("vis command is skipped");
        session
            .execute_line("/vis/drawVolume")
            .expect("vis command is skipped");
    }

    #[test]
    fn beam_on_without_input_file_or_engine_fails_cleanly() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut session = Session::new(temp.path());
        session.execute_line("/run/initialize").expect("initialize");

        let error = session.execute_line("/run/beamOn 10").expect_err("no input file");
        assert_eq!(error.code(), "INPUT.NO_PHASE_SPACE_FILE");

        fs::write(temp.path().join("input.dat"), "1.0 0 0 0 1 0 0 0\n")
            .expect("input should be written");
        session
            .execute_line("/input/setFileName input.dat")
            .expect("input file should be set");

        let error = session.execute_line("/run/beamOn 10").expect_err("no engine linked");
        assert_eq!(error.category(), SimErrorCategory::RunError);
        assert_eq!(error.code(), "RUN.ENGINE_UNAVAILABLE");
    }

    #[test]
    fn full_macro_drives_a_run_through_the_engine() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(
            temp.path().join("input.dat"),
            "# w x y z px py pz t\n1.0 0 0 0 2.0 0 0 0\n3.0 0 0 0 2.0 0 0 0\n",
        )
        .expect("input should be written");
        fs::write(
            temp.path().join("init.mac"),
            "/units/setPositionUnit um\n/run/initialize\n/target/addLayer G4_Al 100\n/input/setFileName input.dat\n/run/beamOn 4\n",
        )
        .expect("macro should be written");

        let mut session = Session::new(temp.path()).with_engine(Box::new(EchoEngine));
        session
            .execute_line("/control/execute init.mac")
            .expect("macro should run");

        let report = session.last_report().expect("run report should exist");
        assert_eq!(report.events, 4);
        assert_eq!(report.macro_particles, 2);
        assert_eq!(report.diagnostics.electron_rows, 4);
        assert!(temp.path().join("results_nt_electron_t0.csv").is_file());
    }

    #[test]
    fn macro_errors_carry_file_and_line_context() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(
            temp.path().join("bad.mac"),
            "/run/initialize\n/target/addLayer G4_Unknownium 10\n",
        )
        .expect("macro should be written");

        let mut session = Session::new(temp.path());
        let error = session
            .execute_line("/control/execute bad.mac")
            .expect_err("bad macro should fail");
        assert_eq!(error.code(), "INPUT.UNKNOWN_MATERIAL");
        assert!(error.message().contains("bad.mac:2:"));
    }

    #[test]
    fn missing_macros_and_runaway_nesting_are_rejected() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut session = Session::new(temp.path());

        let error = session
            .execute_line("/control/execute nowhere.mac")
            .expect_err("missing macro should fail");
        assert_eq!(error.category(), SimErrorCategory::IoSystemError);
        assert_eq!(error.code(), "IO.MACRO_READ");

        // a macro that executes itself
        fs::write(temp.path().join("loop.mac"), "/control/execute loop.mac\n")
            .expect("macro should be written");
        let error = session
            .execute_line("/control/execute loop.mac")
            .expect_err("self-including macro should hit the depth limit");
        assert_eq!(error.code(), "INPUT.MACRO_DEPTH");
        assert!(error.message().contains(&MAX_MACRO_DEPTH.to_string()));
    }
}

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn gp3m2_command(working_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gp3m2"));
    command.current_dir(working_dir);
    command
}

#[test]
fn unknown_subcommand_prints_usage_and_exits_one() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = gp3m2_command(temp.path())
        .arg("transmogrify")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage:"),
        "stderr should contain usage text, stderr: {}",
        stderr
    );
}

#[test]
fn missing_macro_file_maps_to_io_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = gp3m2_command(temp.path())
        .args(["macro", "nowhere.mac"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [IO.MACRO_READ]"),
        "stderr should carry the IO diagnostic, stderr: {}",
        stderr
    );
}

#[test]
fn invalid_macro_command_maps_to_input_exit_code_with_line_context() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(
        temp.path().join("bad.mac"),
        "/run/initialize\n/target/addLayer G4_Al ten\n",
    )
    .expect("macro should be written");

    let output = gp3m2_command(temp.path())
        .args(["macro", "bad.mac"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [INPUT.COMMAND_ARGS]"),
        "stderr should carry the command diagnostic, stderr: {}",
        stderr
    );
    assert!(
        stderr.contains("bad.mac:2:"),
        "stderr should point at the failing macro line, stderr: {}",
        stderr
    );
}

#[test]
fn configuration_only_macro_succeeds() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(
        temp.path().join("setup.mac"),
        "/units/setPositionUnit um\n\
         /run/initialize\n\
         /target/addLayer G4_Al 100\n\
         /target/addLayer G4_Cu 50\n\
         /physics/setPhysicsList simple\n",
    )
    .expect("macro should be written");

    let output = gp3m2_command(temp.path())
        .args(["macro", "setup.mac"])
        .output()
        .expect("binary should run");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn beam_on_without_a_linked_engine_maps_to_run_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("input.dat"), "1.0 0 0 0 1 0 0 0\n")
        .expect("input should be written");
    fs::write(
        temp.path().join("run.mac"),
        "/run/initialize\n\
         /target/addLayer G4_Al 100\n\
         /input/setFileName input.dat\n\
         /run/beamOn 10\n",
    )
    .expect("macro should be written");

    let output = gp3m2_command(temp.path())
        .args(["macro", "run.mac"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [RUN.ENGINE_UNAVAILABLE]"),
        "stderr should name the missing engine backend, stderr: {}",
        stderr
    );
}

#[test]
fn report_flag_without_a_run_is_an_input_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("setup.mac"), "/run/initialize\n")
        .expect("macro should be written");

    let output = gp3m2_command(temp.path())
        .args(["macro", "setup.mac", "--report", "report.json"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [INPUT.NO_RUN_REPORT]"),
        "stderr should explain the missing run, stderr: {}",
        stderr
    );
    assert!(!temp.path().join("report.json").exists());
}

#[test]
fn interactive_session_reads_stdin_until_exit() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mut child = gp3m2_command(temp.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should spawn");

    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(b"/bogus/cmd 1\n/run/initialize\nexit\n")
        .expect("stdin should accept commands");

    let output = child.wait_with_output().expect("binary should finish");
    assert_eq!(
        output.status.code(),
        Some(0),
        "interactive sessions exit cleanly, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ERROR: [INPUT.UNKNOWN_COMMAND]"),
        "bad commands are reported without ending the session, stdout: {}",
        stdout
    );
}

#[test]
fn interactive_session_loads_init_macro_when_present() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("init.mac"), "/run/initialize\n")
        .expect("macro should be written");

    let mut child = gp3m2_command(temp.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should spawn");

    // initialize already ran from init.mac, so a second one must fail
    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(b"/run/initialize\nexit\n")
        .expect("stdin should accept commands");

    let output = child.wait_with_output().expect("binary should finish");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ERROR: [INPUT.COMMAND_STATE]"),
        "stdout should show the double-initialize rejection, stdout: {}",
        stdout
    );
}

#[test]
fn vis_mode_skips_visualization_commands() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("init.mac"), "/run/initialize\n")
        .expect("macro should be written");
    fs::write(
        temp.path().join("init_vis.mac"),
        "/vis/open OGL 600x600-0+0\n/vis/drawVolume\n/vis/viewer/set/viewpointThetaPhi 90 0\n",
    )
    .expect("vis macro should be written");

    let mut child = gp3m2_command(temp.path())
        .arg("vis")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should spawn");

    child
        .stdin
        .as_mut()
        .expect("stdin should be piped")
        .write_all(b"exit\n")
        .expect("stdin should accept commands");

    let output = child.wait_with_output().expect("binary should finish");
    assert_eq!(
        output.status.code(),
        Some(0),
        "vis macros must load without a renderer, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn report_json_shape_is_stable_for_scripted_runs() {
    // the run itself needs an engine backend, so only the report of a
    // failed-run-free macro can be checked end-to-end here; the JSON shape
    // is still pinned through serde on the library type
    let report = gp3m2_core::run::RunReport {
        events: 3,
        macro_particles: 2,
        diagnostics: gp3m2_core::diagnostics::DiagnosticsSummary {
            files: vec!["results_nt_electron_t0.csv".into()],
            electron_rows: 3,
            gamma_rows: 0,
            positron_rows: 0,
        },
    };

    let value: Value =
        serde_json::from_str(&serde_json::to_string(&report).expect("report should serialize"))
            .expect("report JSON should parse");
    assert_eq!(value["events"], Value::from(3));
    assert_eq!(value["macro_particles"], Value::from(2));
    assert_eq!(value["diagnostics"]["electron_rows"], Value::from(3));
    assert_eq!(
        value["diagnostics"]["files"][0],
        Value::from("results_nt_electron_t0.csv")
    );
}

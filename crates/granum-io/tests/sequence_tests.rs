//! Integration tests for snapshot sequencing, the status sidecar,
//! project config, and external-process invocation.

use granum_io::{Project, ProjectConfig, RunOptions, SectionHints, Simulator, WireFormat};
use granum_state::SimState;
use granum_types::GranumError;
use std::path::PathBuf;

/// Creates a fresh project root under the system temp directory.
fn temp_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("granum-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("input")).unwrap();
    std::fs::create_dir_all(root.join("output")).unwrap();
    root
}

// ─── Path Scheme Tests ────────────────────────────────────────

#[test]
fn snapshot_paths_are_zero_padded() {
    let project = Project::with_root("shear-1", &PathBuf::from("/data"));
    assert_eq!(
        project.snapshot_path(42),
        PathBuf::from("/data/output/shear-1.output00042.bin")
    );
    assert_eq!(
        project.input_path(),
        PathBuf::from("/data/input/shear-1.bin")
    );
    assert_eq!(
        project.status_path(),
        PathBuf::from("/data/output/shear-1.status.dat")
    );
}

// ─── Status Sidecar Tests ─────────────────────────────────────

#[test]
fn status_parses_three_fields() {
    let root = temp_root("status-ok");
    let project = Project::with_root("sim", &root);
    std::fs::write(project.status_path(), "1.25 50.0 3\n").unwrap();

    let status = project.status().unwrap();
    assert_eq!(status.current_time, 1.25);
    assert_eq!(status.progress, 50.0);
    assert_eq!(status.last_index, 3);
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_sidecar_is_status_unavailable() {
    let root = temp_root("status-missing");
    let project = Project::with_root("sim", &root);
    let err = project.status().unwrap_err();
    assert!(matches!(err, GranumError::StatusUnavailable(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn malformed_sidecar_is_status_unavailable() {
    let root = temp_root("status-bad");
    let project = Project::with_root("sim", &root);
    std::fs::write(project.status_path(), "not numbers here\n").unwrap();
    let err = project.status().unwrap_err();
    assert!(matches!(err, GranumError::StatusUnavailable(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

// ─── Sequencing Tests ─────────────────────────────────────────

#[test]
fn input_file_round_trips_through_disk() {
    let root = temp_root("input-rt");
    let project = Project::with_root("sim", &root);

    let mut state = SimState::new(5, 1).unwrap();
    state.time.total = 3.0;
    project.write_input(&state, WireFormat::Legacy).unwrap();

    let back =
        granum_io::codec::decode_file(&project.input_path(), SectionHints::default()).unwrap();
    assert_eq!(back, state);
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn read_last_follows_the_sidecar() {
    let root = temp_root("read-last");
    let project = Project::with_root("sim", &root);

    for (index, time) in [(0u32, 0.0f64), (1, 0.5)] {
        let mut state = SimState::new(2, 0).unwrap();
        state.time.current = time;
        let bytes = granum_io::encode(&state, WireFormat::Legacy).unwrap();
        std::fs::write(project.snapshot_path(index), bytes).unwrap();
    }
    std::fs::write(project.status_path(), "0.5 20.0 1\n").unwrap();

    let last = project.read_last(SectionHints::default()).unwrap();
    assert_eq!(last.time.current, 0.5);

    let first = project.read_index(0, SectionHints::default()).unwrap();
    assert_eq!(first.time.current, 0.0);
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn read_last_without_sidecar_reports_status_unavailable() {
    let root = temp_root("read-last-missing");
    let project = Project::with_root("sim", &root);
    let err = project.read_last(SectionHints::default()).unwrap_err();
    assert!(matches!(err, GranumError::StatusUnavailable(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn truncated_snapshot_file_fails_decoding() {
    let root = temp_root("truncated");
    let project = Project::with_root("sim", &root);

    let state = SimState::new(10, 1).unwrap();
    let bytes = granum_io::encode(&state, WireFormat::Legacy).unwrap();
    // Simulate a crash mid-write.
    std::fs::write(project.snapshot_path(0), &bytes[..bytes.len() / 2]).unwrap();

    let err = project
        .read_index(0, SectionHints::default())
        .unwrap_err();
    assert!(matches!(err, GranumError::Decoding(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

// ─── External Process Tests ───────────────────────────────────

#[cfg(unix)]
#[test]
fn successful_run_returns_ok() {
    let root = temp_root("run-ok");
    let project = Project::with_root("sim", &root);
    let simulator = Simulator::new("true");
    simulator.run(&project, RunOptions::default()).unwrap();
    std::fs::remove_dir_all(&root).unwrap();
}

#[cfg(unix)]
#[test]
fn failing_run_surfaces_exit_code() {
    let root = temp_root("run-fail");
    let project = Project::with_root("sim", &root);
    let simulator = Simulator::new("false");
    let err = simulator
        .run(
            &project,
            RunOptions {
                quiet: true,
                dry_run: false,
            },
        )
        .unwrap_err();
    match err {
        GranumError::ExternalProcess { code } => assert_eq!(code, 1),
        other => panic!("expected ExternalProcess, got {other}"),
    }
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unspawnable_binary_is_an_io_error() {
    let root = temp_root("run-missing");
    let project = Project::with_root("sim", &root);
    let simulator = Simulator::new("/nonexistent/simulator-binary");
    let err = simulator.run(&project, RunOptions::default()).unwrap_err();
    assert!(matches!(err, GranumError::Io(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn config_loads_and_builds_project() {
    let root = temp_root("config-ok");
    let path = root.join("project.toml");
    std::fs::write(
        &path,
        "sid = \"consolidation-1e4\"\nroot = \"/data/runs\"\nbinary = \"/opt/dem/simulator\"\n",
    )
    .unwrap();

    let config = ProjectConfig::load(&path).unwrap();
    assert_eq!(config.sid, "consolidation-1e4");
    let project = config.project();
    assert_eq!(
        project.input_path(),
        PathBuf::from("/data/runs/input/consolidation-1e4.bin")
    );
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn config_rejects_empty_sid() {
    let root = temp_root("config-empty-sid");
    let path = root.join("project.toml");
    std::fs::write(&path, "sid = \"\"\nroot = \"/data\"\n").unwrap();
    let err = ProjectConfig::load(&path).unwrap_err();
    assert!(matches!(err, GranumError::InvalidConfig(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn config_rejects_bad_toml() {
    let root = temp_root("config-bad");
    let path = root.join("project.toml");
    std::fs::write(&path, "sid = [this is not toml").unwrap();
    let err = ProjectConfig::load(&path).unwrap_err();
    assert!(matches!(err, GranumError::InvalidConfig(_)));
    std::fs::remove_dir_all(&root).unwrap();
}

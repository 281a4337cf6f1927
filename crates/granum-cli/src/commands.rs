//! CLI command implementations.

use granum_io::{decode_file, encode_file, Project, ProjectConfig, RunOptions, SectionHints,
    Simulator, WireFormat};
use granum_state::SimState;
use serde::Serialize;
use std::path::Path;

fn hints(bonds: bool, fluid: bool) -> SectionHints {
    SectionHints { bonds, fluid }
}

/// Run the external simulator on a configured project.
pub fn run(config_path: &str, quiet: bool, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = ProjectConfig::load(Path::new(config_path))?;
    let binary = config.binary.clone().ok_or_else(|| {
        format!("{config_path}: no `binary` entry — cannot launch the simulator")
    })?;
    let project = config.project();

    println!("Granum Run");
    println!("──────────");
    println!("Project: {}", project.sid);
    println!("Input:   {}", project.input_path().display());
    println!("Binary:  {}", binary.display());
    println!();

    let simulator = Simulator::new(binary);
    simulator.run(&project, RunOptions { quiet, dry_run })?;
    println!("Simulator finished.");
    Ok(())
}

/// Show a simulation's progress from its status sidecar.
pub fn status(sid: &str, root: &str) -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::with_root(sid, Path::new(root));
    match project.status() {
        Ok(status) => {
            println!("Simulation:      {sid}");
            println!("Current time:    {:.4} s", status.current_time);
            println!("Completed:       {:.1} %", status.progress);
            println!(
                "Latest snapshot: {}",
                project.snapshot_path(status.last_index).display()
            );
        }
        Err(granum_types::GranumError::StatusUnavailable(reason)) => {
            println!("Simulation:      {sid}");
            println!("No snapshots yet ({reason}).");
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

/// Per-snapshot summary, printable as text or JSON.
#[derive(Serialize)]
struct Summary {
    particles: usize,
    walls: usize,
    bonds: usize,
    fluid_cells: usize,
    current_time: f64,
    total_time: f64,
    step_count: u32,
    z_min: Option<f64>,
    z_max: Option<f64>,
}

impl Summary {
    fn of(state: &SimState) -> Self {
        Self {
            particles: state.particle_count(),
            walls: state.wall_count(),
            bonds: state.bond_count(),
            fluid_cells: state.fluid.as_ref().map_or(0, |f| f.cell_count()),
            current_time: state.time.current,
            total_time: state.time.total,
            step_count: state.time.step_count,
            z_min: state.particles.z_min(),
            z_max: state.particles.z_max(),
        }
    }
}

/// Inspect a state snapshot.
pub fn inspect(
    path: &str,
    bonds: bool,
    fluid: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = decode_file(Path::new(path), hints(bonds, fluid))?;
    let summary = Summary::of(&state);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Granum Snapshot Inspector");
    println!("─────────────────────────");
    println!();
    println!("Particles:   {}", summary.particles);
    println!("Walls:       {}", summary.walls);
    println!("Bonds:       {}", summary.bonds);
    println!("Fluid cells: {}", summary.fluid_cells);
    println!(
        "Time:        {:.4} / {:.4} s (file {})",
        summary.current_time, summary.total_time, summary.step_count
    );
    if let (Some(lo), Some(hi)) = (summary.z_min, summary.z_max) {
        println!("Z range:     [{lo:.4}, {hi:.4}] m");
    }
    Ok(())
}

/// Decode a snapshot and check every structural invariant.
pub fn validate(path: &str, bonds: bool, fluid: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Decoding already re-validates; reaching here means the file is
    // structurally sound.
    let state = decode_file(Path::new(path), hints(bonds, fluid))?;
    println!(
        "{path}: valid ({} particles, {} walls, {} bonds).",
        state.particle_count(),
        state.wall_count(),
        state.bond_count()
    );
    Ok(())
}

/// Re-encode a legacy snapshot into the self-describing format.
pub fn convert(
    input: &str,
    output: &str,
    bonds: bool,
    fluid: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = decode_file(Path::new(input), hints(bonds, fluid))?;
    encode_file(&state, Path::new(output), WireFormat::Envelope)?;
    println!("{input} -> {output} (self-describing).");
    Ok(())
}

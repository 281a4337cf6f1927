//! Granum CLI — run, sequence, and inspect DEM simulation snapshots.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "granum")]
#[command(version, about = "Control layer for the external DEM/fluid simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the external simulator on a project.
    Run {
        /// Path to the project config (TOML).
        #[arg(short, long, default_value = "project.toml")]
        config: String,

        /// Suppress the simulator's progress output.
        #[arg(short, long)]
        quiet: bool,

        /// Validate the input and exit without time-stepping.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show a simulation's progress from its status sidecar.
    Status {
        /// Simulation id.
        sid: String,

        /// Project root containing `input/` and `output/`.
        #[arg(short, long, default_value = ".")]
        root: String,
    },

    /// Inspect a state snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,

        /// Expect a bond section (legacy files only).
        #[arg(long)]
        bonds: bool,

        /// Expect a fluid section (legacy files only).
        #[arg(long)]
        fluid: bool,

        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Decode a snapshot and check every structural invariant.
    Validate {
        /// Path to snapshot file.
        path: String,

        /// Expect a bond section (legacy files only).
        #[arg(long)]
        bonds: bool,

        /// Expect a fluid section (legacy files only).
        #[arg(long)]
        fluid: bool,
    },

    /// Re-encode a legacy snapshot into the self-describing format.
    Convert {
        /// Path to the legacy snapshot.
        input: String,

        /// Path for the converted file.
        output: String,

        /// The legacy file carries a bond section.
        #[arg(long)]
        bonds: bool,

        /// The legacy file carries a fluid section.
        #[arg(long)]
        fluid: bool,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            quiet,
            dry_run,
        } => commands::run(&config, quiet, dry_run),
        Commands::Status { sid, root } => commands::status(&sid, &root),
        Commands::Inspect {
            path,
            bonds,
            fluid,
            json,
        } => commands::inspect(&path, bonds, fluid, json),
        Commands::Validate { path, bonds, fluid } => commands::validate(&path, bonds, fluid),
        Commands::Convert {
            input,
            output,
            bonds,
            fluid,
        } => commands::convert(&input, &output, bonds, fluid),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

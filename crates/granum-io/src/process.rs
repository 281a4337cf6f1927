//! Invocation of the external simulator binary.
//!
//! The simulator consumes an encoded initial-state file and emits a
//! sequence of numbered snapshots plus an updated status sidecar. It is
//! run as a blocking child process; a nonzero exit status is an
//! explicit error, never a silent warning.

use granum_types::{GranumError, GranumResult};
use std::path::PathBuf;
use std::process::Command;

use crate::project::Project;

/// Flags passed to the simulator binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Suppress the simulator's progress output (`-q`).
    pub quiet: bool,
    /// Validate the input and exit without time-stepping (`-n`).
    pub dry_run: bool,
}

/// Handle to the external simulator executable.
#[derive(Debug, Clone)]
pub struct Simulator {
    binary: PathBuf,
}

impl Simulator {
    /// Wraps the simulator executable at `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs the simulator on the project's input file and blocks until
    /// it exits.
    ///
    /// The input file must have been written beforehand (see
    /// [`Project::write_input`]). Returns
    /// [`GranumError::ExternalProcess`] on a nonzero exit status; a
    /// binary that cannot be spawned surfaces as an I/O error.
    pub fn run(&self, project: &Project, opts: RunOptions) -> GranumResult<()> {
        let input = project.input_path();
        let mut cmd = Command::new(&self.binary);
        if opts.quiet {
            cmd.arg("-q");
        }
        if opts.dry_run {
            cmd.arg("-n");
        }
        cmd.arg(&input);

        tracing::info!(
            binary = %self.binary.display(),
            input = %input.display(),
            quiet = opts.quiet,
            dry_run = opts.dry_run,
            "starting external simulator"
        );

        let status = cmd.status()?;
        if status.success() {
            tracing::info!(sid = %project.sid, "external simulator finished");
            Ok(())
        } else {
            let code = status.code().unwrap_or(-1);
            tracing::error!(sid = %project.sid, code, "external simulator failed");
            Err(GranumError::ExternalProcess { code })
        }
    }
}

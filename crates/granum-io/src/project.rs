//! Project handle and snapshot sequencing.
//!
//! A simulation run is identified by a simulation id (`sid`). Its input
//! file lives in the project's input directory; the external simulator
//! appends numbered snapshots and a status sidecar to the output
//! directory. The handle carries the id and both directories explicitly
//! — there is no implicit "current project".

use granum_state::SimState;
use granum_types::constants::SNAPSHOT_INDEX_DIGITS;
use granum_types::{GranumError, GranumResult};
use std::path::{Path, PathBuf};

use crate::codec::{self, SectionHints, WireFormat};

/// Parsed status sidecar of a simulation.
///
/// The sidecar is a small whitespace-separated text record the
/// simulator rewrites after each output file: current simulation time,
/// percent completed, and the index of the last completed snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    /// Current simulation time (s).
    pub current_time: f64,
    /// Percentage of the total time completed.
    pub progress: f64,
    /// Index of the last completed snapshot.
    pub last_index: u32,
}

/// Handle to one simulation's files.
#[derive(Debug, Clone)]
pub struct Project {
    /// Simulation id — the base name of every file the run touches.
    pub sid: String,
    /// Directory holding the encoded initial state.
    pub input_dir: PathBuf,
    /// Directory the simulator writes snapshots and status into.
    pub output_dir: PathBuf,
}

impl Project {
    /// A project with explicit directories.
    pub fn new(sid: impl Into<String>, input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            sid: sid.into(),
            input_dir,
            output_dir,
        }
    }

    /// A project using the conventional `input/` and `output/`
    /// subdirectories of a root directory.
    pub fn with_root(sid: impl Into<String>, root: &Path) -> Self {
        Self::new(sid, root.join("input"), root.join("output"))
    }

    /// Path of the encoded initial-state file.
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(format!("{}.bin", self.sid))
    }

    /// Path of snapshot `index` (`<sid>.output<NNNNN>.bin`).
    pub fn snapshot_path(&self, index: u32) -> PathBuf {
        self.output_dir.join(format!(
            "{}.output{:0width$}.bin",
            self.sid,
            index,
            width = SNAPSHOT_INDEX_DIGITS
        ))
    }

    /// Path of the status sidecar (`<sid>.status.dat`).
    pub fn status_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.status.dat", self.sid))
    }

    /// Reads and parses the status sidecar.
    ///
    /// A missing or malformed sidecar is reported as
    /// [`GranumError::StatusUnavailable`]; callers treat that as
    /// "no snapshots yet" rather than a crash.
    pub fn status(&self) -> GranumResult<Status> {
        let path = self.status_path();
        let text = std::fs::read_to_string(&path).map_err(|e| {
            GranumError::StatusUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse_status(&text)
            .ok_or_else(|| GranumError::StatusUnavailable(format!("malformed {}", path.display())))
    }

    fn parse_status(text: &str) -> Option<Status> {
        let mut fields = text.split_whitespace();
        let current_time = fields.next()?.parse().ok()?;
        let progress = fields.next()?.parse().ok()?;
        let last_index = fields.next()?.parse().ok()?;
        Some(Status {
            current_time,
            progress,
            last_index,
        })
    }

    /// Encodes `state` and writes it as the simulation's input file.
    pub fn write_input(&self, state: &SimState, format: WireFormat) -> GranumResult<()> {
        codec::encode_file(state, &self.input_path(), format)
    }

    /// Decodes snapshot `index` from the output directory.
    pub fn read_index(&self, index: u32, hints: SectionHints) -> GranumResult<SimState> {
        codec::decode_file(&self.snapshot_path(index), hints)
    }

    /// Decodes the most recent snapshot, located via the status sidecar.
    pub fn read_last(&self, hints: SectionHints) -> GranumResult<SimState> {
        let status = self.status()?;
        self.read_index(status.last_index, hints)
    }
}

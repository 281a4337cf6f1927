//! Project configuration files (TOML).

use granum_types::{GranumError, GranumResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::project::Project;

/// On-disk project description.
///
/// ```toml
/// sid = "consolidation-1e4"
/// root = "/data/runs"
/// binary = "/opt/dem/simulator"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Simulation id.
    pub sid: String,
    /// Root directory containing `input/` and `output/`.
    pub root: PathBuf,
    /// Path to the simulator executable, if runs are launched from
    /// this config.
    pub binary: Option<PathBuf>,
}

impl ProjectConfig {
    /// Loads and parses a config file.
    pub fn load(path: &Path) -> GranumResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ProjectConfig = toml::from_str(&text)
            .map_err(|e| GranumError::InvalidConfig(format!("{}: {e}", path.display())))?;
        if config.sid.is_empty() {
            return Err(GranumError::InvalidConfig(format!(
                "{}: sid must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }

    /// The project handle this config describes.
    pub fn project(&self) -> Project {
        Project::with_root(self.sid.clone(), &self.root)
    }
}

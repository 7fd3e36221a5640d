//! Interpolation job specification and run metadata.
//!
//! This module defines the formal description of one interpolation run and
//! the metadata document that can be written alongside the generated step
//! files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::walk::Target;

/// Specification for a single interpolation run.
/// Contains all information needed to deterministically produce the step
/// files for one scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepJobSpec {
    /// Path to the source scene JSON file.
    pub scene_path: PathBuf,

    /// Maximum magnitude change per step, applied to every targeted
    /// parameter.
    pub offset: f64,

    /// Which parameter set the run interpolates.
    pub target: Target,

    /// Output directory for step files. None means next to the source
    /// scene.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Keep the source scene file after a successful run.
    #[serde(default)]
    pub keep_original: bool,

    /// Write a metadata document alongside the generated step files.
    #[serde(default)]
    pub write_metadata: bool,
}

impl StepJobSpec {
    /// Create a job spec with required fields only.
    pub fn new(scene_path: PathBuf, offset: f64, target: Target) -> Self {
        Self {
            scene_path,
            offset,
            target,
            output_dir: None,
            keep_original: false,
            write_metadata: false,
        }
    }

    /// Validate the job specification before any work happens.
    pub fn validate(&self) -> Result<(), String> {
        if !self.scene_path.exists() {
            return Err(format!("Scene file not found: {:?}", self.scene_path));
        }
        if !self.offset.is_finite() || self.offset <= 0.0 {
            return Err("Offset must be a positive number".to_string());
        }
        Ok(())
    }

    /// Directory the step files are written to.
    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.scene_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

/// Metadata for a completed run.
/// Written beside the generated step files when the job asks for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// The job specification used.
    pub job: StepJobSpec,

    /// Timestamp when the run started (ISO 8601).
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed (ISO 8601).
    pub completed_at: DateTime<Utc>,

    /// Number of step files generated.
    pub step_count: usize,

    /// SHA-256 hash of the source scene file.
    pub scene_hash: String,

    /// scenestep version.
    pub version: String,
}

impl RunMetadata {
    /// Compute SHA-256 hash of file content.
    pub fn hash_file(path: &Path) -> Result<String, std::io::Error> {
        use std::io::Read;

        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = file.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Save metadata to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize metadata: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write metadata: {}", e))
    }
}

//! Read/write the fitted model artifact.
//!
//! The artifact is a single `bincode` blob of [`ModelArtifact`]. There is no
//! version header: the trainer and scorer must agree on the feature contract.

use std::fs::{File, create_dir_all, read};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LeadError, Result};
use crate::pipeline::FittedPipeline;

/// Persisted training output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub trained_at: DateTime<Utc>,
    pub pipeline: FittedPipeline,
}

/// Write the artifact, creating missing parent directories.
pub fn save_artifact(path: &Path, artifact: &ModelArtifact) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| LeadError::storage(path, format!("failed to create directory '{}': {e}", parent.display())))?;
    }

    let file = File::create(path).map_err(|e| LeadError::storage(path, format!("failed to create file: {e}")))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, artifact)
        .map_err(|e| LeadError::storage(path, format!("failed to encode artifact: {e}")))?;
    writer
        .flush()
        .map_err(|e| LeadError::storage(path, format!("failed to flush artifact: {e}")))?;
    Ok(())
}

/// Read an artifact written by [`save_artifact`].
pub fn load_artifact(path: &Path) -> Result<ModelArtifact> {
    // Decode from an in-memory slice so corrupt length prefixes are bounded by the file size.
    let bytes = read(path).map_err(|e| LeadError::storage(path, format!("failed to read file: {e}")))?;
    let artifact: ModelArtifact = bincode::deserialize(&bytes)
        .map_err(|e| LeadError::storage(path, format!("not a valid model artifact: {e}")))?;

    let coefficients = artifact.pipeline.model.coefficients.len();
    let width = artifact.pipeline.encoder.width();
    if coefficients != width {
        return Err(LeadError::storage(
            path,
            format!("artifact has {coefficients} coefficients but its encoder produces {width} columns"),
        ));
    }
    Ok(artifact)
}

//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - ranked/lead CSV and report JSON exports (`export`)
//! - model artifact read/write (`artifact`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::{ModelArtifact, load_artifact, save_artifact};
pub use export::*;
pub use ingest::{LabelPolicy, LeadBatch, read_leads, read_leads_from};

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the feature contract (`contract`): modeled columns and cell parsing
//! - lead records and their typed features (`LeadRecord`, `LeadFeatures`)
//! - scoring outputs (`ScoredLead`, `RankedLeadSet`, `Priority`)

pub mod contract;
pub mod types;

pub use contract::*;
pub use types::*;

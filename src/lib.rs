//! `lead-scorer` library crate.
//!
//! The binary (`leads`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - training, scoring and outreach can be driven from other front-ends
//!
//! Flow: `io::ingest` → `train` (fits a `pipeline`, saved via `io::artifact`)
//! → `score` → `outreach`.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod outreach;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod train;

pub use error::{LeadError, Result};

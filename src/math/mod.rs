//! Numeric utilities: logistic link and the linear solve behind Newton steps.

pub mod logistic;
pub mod solve;

pub use logistic::*;
pub use solve::*;

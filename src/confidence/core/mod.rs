//! Core containers for confidence-model fitting: validated trial data,
//! count aggregation, and batch configuration.

pub mod counts;
pub mod data;
pub mod options;

pub use counts::{CountTable, EmpiricalAnchors};
pub use data::{Design, TrialData};
pub use options::{Execution, FitConfig, ModelSelection};

//! fit — batch orchestration of the confidence-model catalog.

pub mod dispatch;
pub mod orchestrator;
pub mod results;

pub use orchestrator::fit_conf_models;
pub use results::{FitBatch, FitResult, FitRow, FitStatus, FitTable};

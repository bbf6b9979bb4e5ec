//! confidence — static models of decision confidence and their batch fitter.
//!
//! Purpose
//! -------
//! Implement the core fitting stack: validated trial data and count
//! aggregation (`core`), the nine-model registry with transforms and
//! closed-form likelihoods (`models`), and the participant × model batch
//! orchestrator with pluggable dispatch (`fit`).
//!
//! Key behaviors
//! -------------
//! - All likelihoods consume only the per-participant [`core::CountTable`];
//!   trial order is irrelevant.
//! - Models are optimized in a fully unconstrained space via their
//!   `transform`/`untransform` pair and a structured, data-anchored grid
//!   search followed by multi-restart Nelder–Mead descent.
//! - Batch results are merged into a sparse table in deterministic job
//!   order, with advisory warnings attached.
//!
//! Downstream usage
//! ----------------
//! - `fit::fit_conf_models` is the general entry point; `metad` reuses the
//!   same machinery for the reduced meta-d′/d′ procedure.
//! - `models::ConfidenceModel::predict` stays available as a standalone
//!   pure function for visualization overlays, and the count-table layout
//!   is public for information-theoretic consumers.

pub mod core;
pub mod errors;
pub mod fit;
pub mod models;

pub mod prelude {
    pub use super::core::{Design, Execution, FitConfig, ModelSelection, TrialData};
    pub use super::errors::{ConfError, ConfResult, FitWarning, ModelError, ModelResult};
    pub use super::fit::{fit_conf_models, FitBatch, FitResult, FitStatus, FitTable};
    pub use super::models::{ConfidenceModel, ModelKind};
}

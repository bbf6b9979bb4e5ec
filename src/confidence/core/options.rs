//! Fit configuration — model selection, optimizer budget, and execution
//! strategy for one batch invocation.
//!
//! Purpose
//! -------
//! Collect the configuration knobs of a fitting batch in one place, making
//! the workflow explicit and reproducible: which models to fit, how many
//! grid initializers and restarts the optimizer spends per job, and whether
//! jobs run sequentially or on a bounded worker pool.
//!
//! Key behaviors
//! -------------
//! - [`FitConfig`] bundles the model selection, [`SimplexOptions`], and
//!   [`Execution`] strategy; `Default` fits all models with 5 grid
//!   initializers, 4 restarts each, sequentially.
//! - [`ModelSelection`] resolves either the full catalog or a named subset
//!   into concrete [`ModelKind`]s, failing fast on unknown names.
//! - [`Execution`] describes dispatch only; the pool itself is constructed
//!   and torn down inside the dispatch layer, scoped to one batch.
//!
//! Conventions
//! -----------
//! - Validation happens at resolution time (`ModelSelection::resolve`,
//!   `Execution::validate`), before any job starts.
//! - `verbose` controls advisory-warning output on stderr; optimizer-level
//!   logging is governed separately by `SimplexOptions::verbose`.

use crate::confidence::{
    errors::{ConfError, ConfResult},
    models::ModelKind,
};
use crate::optimization::simplex::SimplexOptions;

/// Which catalog models a batch fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// Fit every model in the catalog.
    All,
    /// Fit the listed models, in the given order.
    Subset(Vec<ModelKind>),
}

impl ModelSelection {
    /// Parse a selection from model names ("all" selects the full catalog).
    ///
    /// # Errors
    /// - [`ConfError::UnknownModel`] for any unrecognized name.
    /// - [`ConfError::NoModelsRequested`] for an empty list.
    pub fn from_names(names: &[&str]) -> ConfResult<Self> {
        if names.len() == 1 && names[0].eq_ignore_ascii_case("all") {
            return Ok(ModelSelection::All);
        }
        if names.is_empty() {
            return Err(ConfError::NoModelsRequested);
        }
        let mut kinds = Vec::with_capacity(names.len());
        for name in names {
            kinds.push(name.parse::<ModelKind>()?);
        }
        Ok(ModelSelection::Subset(kinds))
    }

    /// Resolve into the concrete, ordered model list for job enumeration.
    ///
    /// # Errors
    /// - [`ConfError::NoModelsRequested`] for an empty subset.
    pub fn resolve(&self) -> ConfResult<Vec<ModelKind>> {
        match self {
            ModelSelection::All => Ok(ModelKind::all().to_vec()),
            ModelSelection::Subset(kinds) => {
                if kinds.is_empty() {
                    return Err(ConfError::NoModelsRequested);
                }
                Ok(kinds.clone())
            }
        }
    }
}

/// Dispatch strategy for the batch's (participant, model) jobs.
///
/// Jobs are pure functions of their inputs, so the strategy affects wall
/// time only, never results or row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Run jobs one after another on the calling thread.
    Sequential,
    /// Run jobs on a rayon pool scoped to the batch. `workers = None` sizes
    /// the pool to the available parallelism minus one (at least one).
    Parallel { workers: Option<usize> },
}

impl Execution {
    /// Validate the strategy before any job starts.
    ///
    /// # Errors
    /// - [`ConfError::InvalidWorkerCount`] for an explicit zero bound.
    pub fn validate(&self) -> ConfResult<()> {
        if let Execution::Parallel { workers: Some(0) } = self {
            return Err(ConfError::InvalidWorkerCount { workers: 0 });
        }
        Ok(())
    }
}

/// Complete configuration of one fitting batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    /// Models to fit, in report order.
    pub models: ModelSelection,
    /// Grid/optimizer budget shared by every job.
    pub simplex: SimplexOptions,
    /// Sequential or pooled dispatch.
    pub execution: Execution,
    /// Print advisory warnings to stderr.
    pub verbose: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            models: ModelSelection::All,
            simplex: SimplexOptions::default(),
            execution: Execution::Sequential,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Name parsing and resolution of ModelSelection.
    // - Execution validation of the zero-worker edge.
    //
    // They intentionally DO NOT cover:
    // - Dispatch behavior, covered in fit::dispatch.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // "all" resolves to the nine-model catalog; explicit names resolve in
    // request order; unknown names fail fast.
    //
    // Given
    // -----
    // - Selections built from ["all"], ["WEV", "SDT"], and ["SDTX"].
    //
    // Expect
    // ------
    // - Nine models, the ordered pair, and UnknownModel respectively.
    fn selection_parsing_and_resolution() {
        let all = ModelSelection::from_names(&["all"]).expect("all parses");
        assert_eq!(all.resolve().expect("resolves").len(), 9);

        let pair = ModelSelection::from_names(&["WEV", "SDT"]).expect("names parse");
        assert_eq!(
            pair.resolve().expect("resolves"),
            vec![ModelKind::Wev, ModelKind::Sdt]
        );

        assert!(matches!(
            ModelSelection::from_names(&["SDTX"]),
            Err(ConfError::UnknownModel { .. })
        ));
        assert!(matches!(ModelSelection::from_names(&[]), Err(ConfError::NoModelsRequested)));
    }

    #[test]
    // Purpose
    // -------
    // Parallel execution with an explicit zero bound is rejected before the
    // batch starts.
    //
    // Given
    // -----
    // - Execution::Parallel { workers: Some(0) } and Some(2).
    //
    // Expect
    // ------
    // - InvalidWorkerCount for zero; Ok otherwise.
    fn zero_workers_rejected() {
        assert!(matches!(
            Execution::Parallel { workers: Some(0) }.validate(),
            Err(ConfError::InvalidWorkerCount { workers: 0 })
        ));
        assert!(Execution::Parallel { workers: Some(2) }.validate().is_ok());
        assert!(Execution::Sequential.validate().is_ok());
    }
}

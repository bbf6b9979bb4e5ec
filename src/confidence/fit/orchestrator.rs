//! Fit orchestrator — enumerate participant × model jobs and drive the
//! grid → multistart pipeline per job.
//!
//! Purpose
//! -------
//! [`fit_conf_models`] is the batch entry point of the general fitter. It
//! validates configuration up front (fail fast), builds one [`CountTable`]
//! per participant before the model loop, enumerates the deterministic
//! (participant ascending, model in request order) job list, dispatches the
//! jobs under the configured execution strategy, and assembles the ordered
//! [`FitBatch`].
//!
//! Key behaviors
//! -------------
//! - Jobs are pure functions of (counts, model kind, optimizer options);
//!   nothing mutable is shared, so the batch is embarrassingly parallel.
//! - Per-job numerical degeneracy (all grid candidates non-finite, solver
//!   faults) is absorbed into that row's [`FitStatus::Failed`]; the batch
//!   always completes with one row per job.
//! - Advisory warnings ride on the batch and are echoed to stderr under
//!   `verbose`.

use crate::confidence::{
    core::{CountTable, Design, FitConfig, TrialData},
    errors::ConfResult,
    fit::{
        dispatch::run_jobs,
        results::{FitBatch, FitResult, FitTable},
    },
    models::{ConfidenceModel, ModelKind},
};
use crate::optimization::{
    errors::{OptError, OptResult},
    simplex::{multistart, rank_initializers, NegLogLikelihood, SimplexOptions, Theta},
};

/// Objective adapter: a catalog model fitted against one count table.
///
/// `value` composes `untransform` with the model likelihood, so the
/// optimizer works entirely in unconstrained space.
struct ModelObjective<'a> {
    model: &'a dyn ConfidenceModel,
}

impl NegLogLikelihood for ModelObjective<'_> {
    type Data = CountTable;

    fn value(&self, theta: &Theta, counts: &CountTable) -> OptResult<f64> {
        let natural = self.model.untransform(theta)?;
        Ok(self.model.neg_loglik(&natural, counts)?)
    }

    fn check(&self, theta: &Theta, _counts: &CountTable) -> OptResult<()> {
        if theta.len() != self.model.n_params() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.model.n_params(),
                actual: theta.len(),
            });
        }
        Ok(())
    }
}

/// Fit the requested models to every participant.
///
/// # Behavior
/// 1. Resolve and validate the model selection and execution strategy
///    (fail fast; no partial batch on configuration errors).
/// 2. Build one count table per participant, in ascending participant
///    order, before any model work.
/// 3. Enumerate participant × model jobs and dispatch them under the
///    configured strategy; row order is the enumeration order regardless
///    of completion order.
/// 4. Merge rows into the sparse [`FitTable`] and attach warnings.
///
/// # Errors
/// Only configuration and input problems reach the caller; per-job
/// numerical failures are reported in the affected row's status.
pub fn fit_conf_models(data: &TrialData, config: &FitConfig) -> ConfResult<FitBatch> {
    let kinds = config.models.resolve()?;
    config.execution.validate()?;
    let design = data.design;

    let warnings = data.warnings().to_vec();
    if config.verbose {
        for warning in &warnings {
            eprintln!("warning: {warning}");
        }
    }

    let tables: Vec<(u32, CountTable)> = data
        .participants()
        .into_iter()
        .map(|id| (id, CountTable::from_trials(data, id)))
        .collect();

    let jobs: Vec<(usize, ModelKind)> = tables
        .iter()
        .enumerate()
        .flat_map(|(t, _)| kinds.iter().map(move |&kind| (t, kind)))
        .collect();

    let results: Vec<FitResult> = run_jobs(&jobs, &config.execution, |&(t, kind)| {
        let (participant, counts) = &tables[t];
        fit_one_job(*participant, kind, design, counts, &config.simplex)
    })?;

    let table = FitTable::from_results(&results);
    Ok(FitBatch { results, table, warnings })
}

/// Run the grid → multistart pipeline for one (participant, model) job.
///
/// Every failure path below returns a `Failed` row rather than an error:
/// the job stays visible in the report and the rest of the batch proceeds.
fn fit_one_job(
    participant: u32, kind: ModelKind, design: Design, counts: &CountTable,
    opts: &SimplexOptions,
) -> FitResult {
    let n = counts.n_trials();
    let model = match kind.build(design) {
        Ok(model) => model,
        Err(err) => return FitResult::failed(participant, kind, n, 0, err.to_string()),
    };
    let k = model.n_params();
    let objective = ModelObjective { model: model.as_ref() };

    let candidates = model.grid_candidates(&counts.anchors());
    let inits = match rank_initializers(&objective, counts, &candidates, opts.n_inits) {
        Ok(inits) => inits,
        Err(err) => return FitResult::failed(participant, kind, n, k, err.to_string()),
    };
    let outcome = match multistart(&objective, &inits, counts, opts) {
        Ok(outcome) => outcome,
        Err(err) => return FitResult::failed(participant, kind, n, k, err.to_string()),
    };
    let natural = match model.untransform(&outcome.theta_hat) {
        Ok(natural) => natural,
        Err(err) => return FitResult::failed(participant, kind, n, k, err.to_string()),
    };
    FitResult::from_optimum(
        participant,
        kind,
        model.param_names(),
        natural.to_vec(),
        &outcome,
        n,
    )
}

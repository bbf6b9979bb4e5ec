//! rust_statconf — maximum-likelihood fitting of static models of decision
//! confidence, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the two fitting entry points to Python via the `_rust_statconf`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing functions used by the `rust_statconf`
//! package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`confidence`, `metad`, `simulation`)
//!   as the public crate surface.
//! - Define the `#[pyfunction]` wrappers and the `#[pymodule]` initializer
//!   for the `_rust_statconf` Python extension.
//! - Convert batch results into per-row dictionaries whose keys follow the
//!   sparse result-table columns (missing parameters map to `None`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input conversion, and error mapping.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - Python callers use `fit_conf_models` and `fit_meta_dprime` from the
//!   compiled `_rust_statconf` module; both accept numpy arrays, pandas
//!   Series, or plain sequences per column.

pub mod confidence;
pub mod metad;
pub mod optimization;
pub mod simulation;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny, types::PyDict};

#[cfg(feature = "python-bindings")]
use crate::{
    confidence::{
        core::{Execution, FitConfig, ModelSelection, TrialData},
        fit::fit_conf_models as fit_conf_models_rs,
    },
    metad::{fit_meta_dprime as fit_meta_dprime_rs, MetaDVariant},
    optimization::simplex::SimplexOptions,
    utils::{extract_f64_vec, extract_u32_vec, extract_u8_vec, extract_usize_vec},
};

#[cfg(feature = "python-bindings")]
fn build_options(
    n_inits: Option<usize>, n_restarts: Option<usize>,
) -> PyResult<SimplexOptions> {
    let defaults = SimplexOptions::default();
    SimplexOptions::new(
        defaults.tols,
        n_inits.unwrap_or(defaults.n_inits),
        n_restarts.unwrap_or(defaults.n_restarts),
        defaults.init_step,
        false,
    )
    .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

#[cfg(feature = "python-bindings")]
fn build_execution(parallel: bool, workers: Option<usize>) -> Execution {
    if parallel { Execution::Parallel { workers } } else { Execution::Sequential }
}

/// Fit the requested confidence models to every participant.
///
/// Returns one dict per (participant, model) row with the sparse parameter
/// columns (missing parameters are `None`) plus negLogLik, N, k, BIC, AIC,
/// AICc, and the job status.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (participant, stimulus, correct, rating, level = None, models = None,
                 n_inits = None, n_restarts = None, parallel = false, workers = None),
    text_signature = "(participant, stimulus, correct, rating, /, level=None, models=None, \
                      n_inits=5, n_restarts=4, parallel=False, workers=None)"
)]
pub fn fit_conf_models<'py>(
    py: Python<'py>, participant: &Bound<'py, PyAny>, stimulus: &Bound<'py, PyAny>,
    correct: &Bound<'py, PyAny>, rating: &Bound<'py, PyAny>, level: Option<&Bound<'py, PyAny>>,
    models: Option<Vec<String>>, n_inits: Option<usize>, n_restarts: Option<usize>,
    parallel: bool, workers: Option<usize>,
) -> PyResult<Vec<Bound<'py, PyDict>>> {
    let participant = extract_u32_vec(py, participant)?;
    let stimulus = extract_f64_vec(py, stimulus)?;
    let correct = extract_u8_vec(py, correct)?;
    let rating = extract_usize_vec(py, rating)?;
    let level = level.map(|raw| extract_usize_vec(py, raw)).transpose()?;

    let data =
        TrialData::new(&participant, &stimulus, &correct, &rating, level.as_deref())?;
    let selection = match models {
        Some(names) => {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            ModelSelection::from_names(&refs)?
        }
        None => ModelSelection::All,
    };
    let config = FitConfig {
        models: selection,
        simplex: build_options(n_inits, n_restarts)?,
        execution: build_execution(parallel, workers),
        verbose: false,
    };
    let batch = fit_conf_models_rs(&data, &config)?;

    let mut rows = Vec::with_capacity(batch.table.rows.len());
    for (row, result) in batch.table.rows.iter().zip(batch.results.iter()) {
        let dict = PyDict::new(py);
        dict.set_item("participant", row.participant)?;
        dict.set_item("model", &row.model)?;
        for (column, value) in batch.table.columns.iter().zip(row.values.iter()) {
            dict.set_item(column, *value)?;
        }
        dict.set_item("status", format!("{:?}", result.status))?;
        rows.push(dict);
    }
    Ok(rows)
}

/// Estimate meta-d′/d′ per participant.
///
/// `model` selects the specification: "ML" (Maniscalco–Lau) or "F"
/// (Fleming). Returns one dict per participant with dprime, c, metaD, and
/// Ratio.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (participant, stimulus, correct, rating, level = None, model = "ML",
                 n_inits = None, n_restarts = None, parallel = false, workers = None),
    text_signature = "(participant, stimulus, correct, rating, /, level=None, model='ML', \
                      n_inits=5, n_restarts=4, parallel=False, workers=None)"
)]
pub fn fit_meta_dprime<'py>(
    py: Python<'py>, participant: &Bound<'py, PyAny>, stimulus: &Bound<'py, PyAny>,
    correct: &Bound<'py, PyAny>, rating: &Bound<'py, PyAny>, level: Option<&Bound<'py, PyAny>>,
    model: &str, n_inits: Option<usize>, n_restarts: Option<usize>, parallel: bool,
    workers: Option<usize>,
) -> PyResult<Vec<Bound<'py, PyDict>>> {
    let participant = extract_u32_vec(py, participant)?;
    let stimulus = extract_f64_vec(py, stimulus)?;
    let correct = extract_u8_vec(py, correct)?;
    let rating = extract_usize_vec(py, rating)?;
    let level = level.map(|raw| extract_usize_vec(py, raw)).transpose()?;

    let data =
        TrialData::new(&participant, &stimulus, &correct, &rating, level.as_deref())?;
    let variant: MetaDVariant = model.parse()?;
    let opts = build_options(n_inits, n_restarts)?;
    let execution = build_execution(parallel, workers);
    let outcomes = fit_meta_dprime_rs(&data, variant, &opts, &execution)?;

    let mut rows = Vec::with_capacity(outcomes.len());
    for outcome in &outcomes {
        let dict = PyDict::new(py);
        dict.set_item("model", outcome.model.name())?;
        dict.set_item("participant", outcome.participant)?;
        dict.set_item("dprime", outcome.dprime)?;
        dict.set_item("c", outcome.criterion)?;
        dict.set_item("metaD", outcome.meta_d)?;
        dict.set_item("Ratio", outcome.ratio)?;
        rows.push(dict);
    }
    Ok(rows)
}

/// _rust_statconf — PyO3 module initializer for the Python extension.
///
/// Registers the two fitting entry points; the pure-Python `rust_statconf`
/// package wraps them in a DataFrame-returning facade.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_statconf<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fit_conf_models, m)?)?;
    m.add_function(wrap_pyfunction!(fit_meta_dprime, m)?)?;
    Ok(())
}

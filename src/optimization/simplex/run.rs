//! Execution helper that runs an `argmin` Nelder–Mead solver on a
//! negative-log-likelihood problem and returns a crate-friendly
//! [`OptimOutcome`].

use crate::optimization::{
    errors::OptResult,
    simplex::{
        adapter::ArgMinAdapter,
        traits::{NegLogLikelihood, OptimOutcome, SimplexOptions},
        types::Theta,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::CostFunction;
use argmin::core::{Executor, Solver, State};

/// Run a single Nelder–Mead optimization on a prepared problem.
///
/// Wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - a fully constructed `NelderMead` solver (from
///   [`build_solver`](crate::optimization::simplex::builders::build_solver))
///   whose simplex is already centered on `theta0`,
/// - the iteration cap from `opts.tols.max_iter`,
/// - optional observers (behind the `obs_slog` feature),
///
/// then executes the solver and converts the terminal state into an
/// [`OptimOutcome`]. The initial point lives inside the solver's simplex, so
/// no parameter is set on the executor state; `theta0` is only used for the
/// one-time pre-iteration log line under `verbose`.
///
/// # Errors
/// - Propagates any `argmin` runtime error via the crate's
///   `From<argmin::core::Error>` conversion.
/// - Propagates validation errors from [`OptimOutcome::new`].
pub fn run_simplex<'a, F, S>(
    theta0: &Theta, opts: &SimplexOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: NegLogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, argmin::core::IterState<Theta, (), (), (), (), f64>>
        + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(theta0, &problem)?;
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = theta0;

    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.max_iters(opts.tols.max_iter as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    OptimOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: NegLogLikelihood,
{
    let nll0 = problem.cost(theta0)?;
    eprintln!("init: -ell(theta0) = {nll0:.6}");
    Ok(())
}

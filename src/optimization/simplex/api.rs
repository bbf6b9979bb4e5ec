//! High-level entry points for derivative-free minimization.
//!
//! [`minimize`] runs one Nelder–Mead descent from a single point.
//! [`multistart`] is the driver the fitting pipeline actually uses: it takes
//! the ranked grid initializers and runs `n_restarts` consecutive descents
//! per initializer, reseeding each restart's simplex from the previous
//! restart's optimum, keeping the global best across all runs.

use crate::optimization::{
    errors::{OptError, OptResult},
    simplex::{
        adapter::ArgMinAdapter,
        builders::{build_initial_simplex, build_solver},
        run::run_simplex,
        traits::{NegLogLikelihood, OptimOutcome, SimplexOptions},
        types::Theta,
        validation::validate_theta,
    },
};

/// Minimize `-ℓ(θ)` with a single Nelder–Mead run started at `theta0`.
///
/// # Behavior
/// - Validates `theta0` (finite) and the pair via `f.check(theta0, data)`.
/// - Builds the initial simplex around `theta0` with `opts.init_step`.
/// - Runs the solver for at most `opts.tols.max_iter` iterations.
///
/// Hitting the iteration cap is not an error; the best vertex found is
/// returned with `converged == false`.
///
/// # Errors
/// - Propagates any error from `f.check`, solver construction, or the run.
pub fn minimize<F: NegLogLikelihood>(
    f: &F, theta0: &Theta, data: &F::Data, opts: &SimplexOptions,
) -> OptResult<OptimOutcome> {
    validate_theta(theta0)?;
    f.check(theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let simplex = build_initial_simplex(theta0, opts.init_step);
    let solver = build_solver(simplex, &opts.tols)?;
    run_simplex(theta0, opts, problem, solver)
}

/// Multi-start, multi-restart minimization over a set of initializers.
///
/// For each initializer, runs `opts.n_restarts` consecutive Nelder–Mead
/// descents; restart `r + 1` rebuilds its simplex around restart `r`'s
/// optimum. Reseeding from the previous optimum (rather than a fresh grid
/// point) is a deliberate heuristic against shallow simplex collapse; it
/// carries no convergence guarantee, and changing it would change which
/// local optimum a given dataset reproducibly lands on.
///
/// The global minimum across all `inits.len() × n_restarts` runs is returned.
///
/// # Errors
/// - [`OptError::NoInitializers`] when `inits` is empty.
/// - Propagates the first hard solver error encountered; penalty
///   substitution in the adapter means numerical degeneracy does not
///   surface as an error here.
pub fn multistart<F: NegLogLikelihood>(
    f: &F, inits: &[Theta], data: &F::Data, opts: &SimplexOptions,
) -> OptResult<OptimOutcome> {
    if inits.is_empty() {
        return Err(OptError::NoInitializers);
    }
    let mut best: Option<OptimOutcome> = None;
    for init in inits {
        let mut seed = init.clone();
        for _ in 0..opts.n_restarts {
            let outcome = minimize(f, &seed, data, opts)?;
            seed = outcome.theta_hat.clone();
            let improved = best.as_ref().map_or(true, |b| outcome.value < b.value);
            if improved {
                best = Some(outcome);
            }
        }
    }
    best.ok_or(OptError::UnknownError)
}

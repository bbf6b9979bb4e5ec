//! Public API surface for derivative-free negative-log-likelihood minimization.
//!
//! - [`NegLogLikelihood`]: trait implemented by each objective (model × data).
//! - [`SimplexOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`OptimOutcome`]: normalized result returned by the high-level APIs.
//!
//! Convention: the objective IS the cost. All models in this crate express
//! their fit quality as a negative log-likelihood `-ℓ(θ)` in unconstrained
//! θ-space, so the simplex solver minimizes the user value directly — there
//! is no sign-flipping adapter layer.

use argmin::core::{TerminationReason, TerminationStatus};

use crate::optimization::{
    errors::{OptError, OptResult},
    simplex::{
        types::{Cost, FnEvalMap, Theta},
        validation::{validate_theta_hat, validate_value},
    },
};

/// User-implemented negative-log-likelihood interface.
///
/// Implementors evaluate `-ℓ(θ)` for an unconstrained parameter vector `θ`.
/// Constraint handling (ordering, positivity) lives inside the implementor's
/// untransform step, never in the optimizer.
///
/// - `type Data`: per-objective data carried into `value`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `-ℓ(θ)`. May return
///   non-finite values for degenerate regions; the adapter substitutes a
///   finite penalty before the solver sees them.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
pub trait NegLogLikelihood {
    type Data;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;
}

/// Numerical tolerances and iteration limit for one Nelder–Mead run.
///
/// - `sd_tol`: terminate when the sample standard deviation of the simplex
///   vertices' objective values falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations. Hitting the cap is not
///   an error; the best vertex found is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub sd_tol: f64,
    pub max_iter: usize,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - `sd_tol` must be finite and strictly positive.
    /// - `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::InvalidSdTolerance`] / [`OptError::InvalidMaxIter`].
    pub fn new(sd_tol: f64, max_iter: usize) -> OptResult<Self> {
        if !sd_tol.is_finite() || sd_tol <= 0.0 {
            return Err(OptError::InvalidSdTolerance {
                tol: sd_tol,
                reason: "Simplex tolerance must be finite and strictly positive.",
            });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { sd_tol, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { sd_tol: 1e-8, max_iter: 800 }
    }
}

/// Optimizer-level configuration for the multi-start simplex driver.
///
/// Fields:
/// - `tols: Tolerances` — per-run tolerance and iteration cap.
/// - `n_inits: usize` — number of grid initializers carried into local
///   optimization.
/// - `n_restarts: usize` — consecutive Nelder–Mead runs per initializer,
///   each reseeded from the previous run's optimum.
/// - `init_step: f64` — per-coordinate displacement used to build the
///   initial simplex around a point.
/// - `verbose: bool` — if `true`, prints per-run progress to stderr (and
///   attaches a slog observer behind the `obs_slog` feature).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexOptions {
    pub tols: Tolerances,
    pub n_inits: usize,
    pub n_restarts: usize,
    pub init_step: f64,
    pub verbose: bool,
}

impl SimplexOptions {
    /// Create a validated set of optimizer options.
    ///
    /// # Errors
    /// - [`OptError::NoInitializers`] if `n_inits == 0`.
    /// - [`OptError::NoRestarts`] if `n_restarts == 0`.
    /// - [`OptError::InvalidInitStep`] for a non-finite or non-positive step.
    pub fn new(
        tols: Tolerances, n_inits: usize, n_restarts: usize, init_step: f64, verbose: bool,
    ) -> OptResult<Self> {
        if n_inits == 0 {
            return Err(OptError::NoInitializers);
        }
        if n_restarts == 0 {
            return Err(OptError::NoRestarts);
        }
        if !init_step.is_finite() || init_step <= 0.0 {
            return Err(OptError::InvalidInitStep {
                step: init_step,
                reason: "Initial simplex step must be finite and strictly positive.",
            });
        }
        Ok(Self { tols, n_inits, n_restarts, init_step, verbose })
    }
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            n_inits: 5,
            n_restarts: 4,
            init_step: 0.25,
            verbose: false,
        }
    }
}

/// Canonical result returned by `minimize` and `multistart`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best negative log-likelihood `-ℓ(θ̂)`.
/// - `converged`: `true` if the solver terminated on its own criterion
///   rather than the iteration cap.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`, where hitting
    ///   the iteration cap counts as non-converged but is not an error.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => match reason {
                TerminationReason::MaxItersReached => (false, "Iteration cap reached".to_string()),
                other => (true, format!("{other:?}")),
            },
        };
        Ok(Self { theta_hat, value, converged, status, iterations: iterations as usize, fn_evals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation rules of Tolerances::new and SimplexOptions::new.
    // - Termination-status mapping in OptimOutcome::new.
    //
    // They intentionally DO NOT cover:
    // - End-to-end solver behavior, which is tested in the runner and
    //   api layers.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that invalid tolerance inputs are rejected with structured
    // errors while valid inputs construct.
    //
    // Given
    // -----
    // - sd_tol in {0.0, NaN, 1e-8}, max_iter in {0, 100}.
    //
    // Expect
    // ------
    // - Zero/NaN tolerance and zero max_iter fail; the valid pair succeeds.
    fn tolerances_validate_inputs() {
        assert!(matches!(
            Tolerances::new(0.0, 100),
            Err(OptError::InvalidSdTolerance { .. })
        ));
        assert!(matches!(
            Tolerances::new(f64::NAN, 100),
            Err(OptError::InvalidSdTolerance { .. })
        ));
        assert!(matches!(Tolerances::new(1e-8, 0), Err(OptError::InvalidMaxIter { .. })));
        assert!(Tolerances::new(1e-8, 100).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify that SimplexOptions rejects empty init/restart budgets and a
    // degenerate simplex step.
    //
    // Given
    // -----
    // - Valid tolerances; n_inits or n_restarts of zero; step of 0.0.
    //
    // Expect
    // ------
    // - Each degenerate input maps to its dedicated error variant.
    fn simplex_options_validate_inputs() {
        let tols = Tolerances::default();
        assert!(matches!(
            SimplexOptions::new(tols, 0, 4, 0.25, false),
            Err(OptError::NoInitializers)
        ));
        assert!(matches!(
            SimplexOptions::new(tols, 5, 0, 0.25, false),
            Err(OptError::NoRestarts)
        ));
        assert!(matches!(
            SimplexOptions::new(tols, 5, 4, 0.0, false),
            Err(OptError::InvalidInitStep { .. })
        ));
        assert!(SimplexOptions::new(tols, 5, 4, 0.25, false).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the iteration cap maps to a non-converged but valid outcome.
    //
    // Given
    // -----
    // - A finite theta and value with TerminationReason::MaxItersReached.
    //
    // Expect
    // ------
    // - converged == false and a descriptive status string.
    fn iteration_cap_is_not_converged() {
        let outcome = OptimOutcome::new(
            Some(ndarray::array![0.1, 0.2]),
            3.5,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            800,
            FnEvalMap::new(),
        )
        .expect("outcome should validate");
        assert!(!outcome.converged);
        assert_eq!(outcome.status, "Iteration cap reached");
        assert_eq!(outcome.iterations, 800);
    }
}

//! simplex — derivative-free, Argmin-powered negative-log-likelihood
//! minimizer.
//!
//! Purpose
//! -------
//! Provide the optimization engine for the confidence-model fitting
//! pipeline: Nelder–Mead simplex descent over unconstrained parameter
//! vectors, structured grid initialization, and a multi-start /
//! multi-restart driver. Callers implement [`NegLogLikelihood`] and use
//! [`rank_initializers`] + [`multistart`] (or [`minimize`] for a single
//! descent).
//!
//! Key behaviors
//! -------------
//! - Expose the user objective to Argmin via [`adapter::ArgMinAdapter`],
//!   which substitutes a large finite penalty for every non-finite
//!   evaluation so the solver never orders against NaN.
//! - Build initial simplexes around a point with per-coordinate scaled
//!   displacements ([`builders`]).
//! - Rank data-anchored grid candidates ascending by objective value with
//!   stable tie order ([`grid`]), failing loudly when no candidate is
//!   finite.
//! - Run `n_inits × n_restarts` descents, reseeding each restart from the
//!   previous optimum, and keep the global best ([`api::multistart`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters live in a fully unconstrained space; ordering/positivity
//!   constraints are handled by the model layer's transforms.
//! - Objective implementations may return non-finite values but must not
//!   panic; hard errors are reserved for structural problems (dimension
//!   mismatches).
//! - Hitting the iteration cap is an accepted outcome, never an error.
//!
//! Conventions
//! -----------
//! - The objective is minimized directly; it already is `-ℓ(θ)`. There is
//!   no sign-flip layer anywhere in this stack.
//! - Vectors use the canonical [`Theta`] alias (`Array1<f64>`).
//! - Public entry points return `OptResult<T>`; callers never see raw
//!   Argmin errors.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod grid;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use api::{minimize, multistart};
pub use grid::rank_initializers;
pub use traits::{NegLogLikelihood, OptimOutcome, SimplexOptions, Tolerances};
pub use types::{Cost, FnEvalMap, Theta};

pub mod prelude {
    pub use super::{
        minimize, multistart, rank_initializers, Cost, FnEvalMap, NegLogLikelihood, OptimOutcome,
        SimplexOptions, Theta, Tolerances,
    };
}

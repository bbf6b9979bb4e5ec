//! optimization — derivative-free MLE stack, numerical helpers, and unified
//! error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for confidence-model fitting,
//! combining an Argmin-backed Nelder–Mead engine, numerically stable
//! parameter transforms, and a single error/result surface. Callers
//! implement a negative log-likelihood, provide grid candidates, and obtain
//! fitted parameters and diagnostics without touching backend solver
//! details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing negative log-likelihoods**
//!   `-ℓ(θ)` (`simplex`), including grid-candidate ranking and the
//!   multi-start × multi-restart driver.
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   unconstrained parameters into model space: guarded exp/ln, the
//!   logistic pair, and ordered-chain increment transforms.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - Optimizers operate in an unconstrained parameter space `θ` and treat
//!   domain violations as recoverable: non-finite objective values become a
//!   large finite penalty, invalid configuration becomes `OptError`.
//! - Parameters are represented through the `ndarray`-based [`simplex::Theta`]
//!   alias; mapping between θ-space and structured model parameters is the
//!   model layer's job.
//! - This module and its submodules avoid I/O except for optional verbose
//!   progress lines on stderr.

pub mod errors;
pub mod numerical_stability;
pub mod simplex;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_statconf::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
    pub use super::simplex::prelude::*;
}

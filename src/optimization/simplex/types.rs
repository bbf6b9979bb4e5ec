//! simplex::types — shared numeric aliases for the derivative-free optimizer.
//!
//! Centralizes the core numeric types used by the simplex stack so the rest
//! of the optimization code stays agnostic to `ndarray` and Argmin generics.

use std::collections::HashMap;

use ndarray::Array1;

/// Parameter vector `θ` in unconstrained optimizer space.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer and the model layer.
pub type Theta = Array1<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate the objective is always a negative log-likelihood
/// `-ℓ(θ)`, minimized directly.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

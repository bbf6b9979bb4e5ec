//! Adapter that exposes a user `NegLogLikelihood` as an `argmin` problem.
//!
//! The objective is minimized as-is (it already is a negative
//! log-likelihood), so the only responsibility here is the non-finite
//! guard: any NaN/∞ evaluation is replaced by the large finite [`PENALTY`]
//! before the simplex solver sees it. Genuine evaluation errors (wrong
//! dimension, model-layer failures) still propagate as errors.

use crate::optimization::{
    numerical_stability::transformations::PENALTY,
    simplex::{
        traits::NegLogLikelihood,
        types::{Cost, Theta},
    },
};
use argmin::core::{CostFunction, Error};

/// Bridges a user `NegLogLikelihood` to `argmin`'s `CostFunction`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` directly.
/// - Non-finite values are replaced by [`PENALTY`]; the solver therefore
///   never compares against NaN and simply retreats from degenerate regions.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: NegLogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: NegLogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user objective and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: NegLogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the objective `-ℓ(θ)` with the non-finite guard applied.
    ///
    /// A vertex containing non-finite coordinates (possible after repeated
    /// simplex expansions) is also mapped to the penalty rather than being
    /// handed to the model layer.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        if theta.iter().any(|v| !v.is_finite()) {
            return Ok(PENALTY);
        }
        let output = self.f.value(theta, self.data)?;
        if output.is_finite() { Ok(output) } else { Ok(PENALTY) }
    }
}

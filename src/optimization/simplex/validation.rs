//! Validation helpers for optimizer inputs and outcomes.
//!
//! Small reusable checks shared by the adapter, runner, and outcome
//! construction: finiteness of unconstrained parameter vectors and of the
//! best objective value found.

use crate::optimization::{
    errors::{OptError, OptResult},
    simplex::types::Theta,
};

/// Validate that every entry of an unconstrained parameter vector is finite.
///
/// # Errors
/// - [`OptError::InvalidThetaInput`] with the first offending index/value.
pub fn validate_theta(theta: &Theta) -> OptResult<()> {
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate the solver's best parameter vector.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if the solver produced no best point.
/// - [`OptError::InvalidThetaHat`] if any coordinate is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta_hat = theta_hat.ok_or(OptError::MissingThetaHat)?;
    for (index, &value) in theta_hat.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaHat {
                index,
                value,
                reason: "Estimated parameters must be finite.",
            });
        }
    }
    Ok(theta_hat)
}

/// Validate the best objective value found by a run.
///
/// The penalty substitution in the adapter guarantees finiteness of every
/// value the solver compares, so a non-finite best value indicates a wiring
/// bug rather than a numerical accident.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::PotentialBug {
            text: format!("best objective value is non-finite: {value}"),
        });
    }
    Ok(())
}

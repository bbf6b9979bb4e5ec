//! Builders for the Nelder–Mead solver and its initial simplex.
//!
//! The simplex solver needs `dim + 1` affinely independent vertices. We build
//! them from a single point by displacing one coordinate at a time, scaled to
//! the coordinate's magnitude so parameters living on very different scales
//! (log-gaps vs criteria) get comparable relative perturbations.

use crate::optimization::{
    errors::OptResult,
    simplex::{
        traits::Tolerances,
        types::{Cost, Theta},
    },
};
use argmin::solver::neldermead::NelderMead;

/// Build the initial simplex around `theta0`.
///
/// Vertex 0 is `theta0` itself; vertex `i + 1` displaces coordinate `i` by
/// `step · max(1, |θ₀ᵢ|)`. The resulting `dim + 1` vertices are affinely
/// independent for any finite `theta0` and positive `step`.
///
/// # Arguments
/// - `theta0`: center point of the simplex.
/// - `step`: relative displacement per coordinate (validated upstream in
///   `SimplexOptions::new`).
pub fn build_initial_simplex(theta0: &Theta, step: f64) -> Vec<Theta> {
    let dim = theta0.len();
    let mut vertices = Vec::with_capacity(dim + 1);
    vertices.push(theta0.clone());
    for i in 0..dim {
        let mut vertex = theta0.clone();
        vertex[i] += step * theta0[i].abs().max(1.0);
        vertices.push(vertex);
    }
    vertices
}

/// Construct a Nelder–Mead solver from a prebuilt simplex.
///
/// Applies the standard-deviation tolerance from `tols`; the iteration cap is
/// configured on the executor state by the runner.
///
/// # Errors
/// - Propagates `argmin` rejection of the tolerance via the crate's
///   `From<argmin::core::Error>` conversion.
pub fn build_solver(
    simplex: Vec<Theta>, tols: &Tolerances,
) -> OptResult<NelderMead<Theta, Cost>> {
    let solver = NelderMead::new(simplex).with_sd_tolerance(tols.sd_tol)?;
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Simplex shape and displacement scaling in build_initial_simplex.
    // - Solver construction with a valid tolerance.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior, which is tested in the runner layer.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the simplex has dim + 1 vertices and each displaced vertex
    // differs from the center in exactly one coordinate.
    //
    // Given
    // -----
    // - theta0 = [0.0, -4.0] and step = 0.25.
    //
    // Expect
    // ------
    // - Three vertices; displacement 0.25 on the unit-scale coordinate and
    //   1.0 on the magnitude-4 coordinate.
    fn simplex_scales_displacement_per_coordinate() {
        let theta0 = array![0.0, -4.0];
        let simplex = build_initial_simplex(&theta0, 0.25);
        assert_eq!(simplex.len(), 3);
        assert_eq!(simplex[0], theta0);
        assert!((simplex[1][0] - 0.25).abs() < 1e-12);
        assert!((simplex[1][1] - (-4.0)).abs() < 1e-12);
        assert!((simplex[2][1] - (-3.0)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure build_solver accepts a well-formed simplex and tolerance.
    //
    // Given
    // -----
    // - A 2-D simplex and the default tolerances.
    //
    // Expect
    // ------
    // - build_solver returns Ok(_).
    fn build_solver_accepts_valid_inputs() {
        let simplex = build_initial_simplex(&array![0.1, 0.2], 0.25);
        assert!(build_solver(simplex, &Tolerances::default()).is_ok());
    }
}

//! Signal-detection model: one evidence sample drives choice and confidence.
//!
//! The rating criteria partition the type-1 evidence axis directly:
//! θ⁻ₗ₋₁ < … < θ⁻₁ < c < θ⁺₁ < … < θ⁺ₗ₋₁. A cell's probability is the
//! normal CDF difference over its interval, so every other catalog model
//! nests SDT as its confidence-noise parameter vanishes.
//!
//! Parameters: d₁…d_K (ordered sensitivities), c, and the 2(L−1) criteria;
//! k = K + 2L − 1.

use ndarray::Array2;

use crate::confidence::{
    core::{Design, EmpiricalAnchors},
    errors::ModelResult,
    models::{
        layout::{self, CriteriaStyle},
        prob::{normal, side_minus_prob, side_rating_probs},
        scaled_criteria, scaled_d, ConfidenceModel, ModelKind,
    },
};
use crate::optimization::simplex::Theta;

const EXTRAS: &[layout::ExtraKind] = &[];
const D_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const CRIT_SCALES: [f64; 3] = [0.5, 1.0, 2.0];

/// Signal-detection theory model of decision confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sdt {
    design: Design,
}

impl Sdt {
    pub fn new(design: Design) -> Self {
        Self { design }
    }
}

impl ConfidenceModel for Sdt {
    fn kind(&self) -> ModelKind {
        ModelKind::Sdt
    }

    fn design(&self) -> Design {
        self.design
    }

    fn n_params(&self) -> usize {
        layout::layout_len(self.design.n_levels, self.design.n_ratings, 0)
    }

    fn param_names(&self) -> Vec<String> {
        layout::layout_names(self.design.n_levels, self.design.n_ratings, &[])
    }

    fn transform(&self, natural: &Theta) -> ModelResult<Theta> {
        let theta = layout::transform_natural(
            &natural.to_vec(),
            self.design.n_levels,
            self.design.n_ratings,
            EXTRAS,
            CriteriaStyle::AroundC,
        )?;
        Ok(Theta::from(theta))
    }

    fn untransform(&self, theta: &Theta) -> ModelResult<Theta> {
        let natural = layout::untransform_natural(
            &theta.to_vec(),
            self.design.n_levels,
            self.design.n_ratings,
            EXTRAS,
            CriteriaStyle::AroundC,
        )?;
        Ok(Theta::from(natural))
    }

    fn predict(&self, natural: &Theta) -> ModelResult<Array2<f64>> {
        let k = self.design.n_levels;
        let l = self.design.n_ratings;
        let params = layout::validate(&natural.to_vec(), k, l, EXTRAS, CriteriaStyle::AroundC)?;
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let mu = s * params.d[level] / 2.0;
                let dist = normal(mu, 1.0)?;
                let p_minus = side_minus_prob(&dist, params.c);
                let lower = side_rating_probs(&dist, &params.tm, params.c, false);
                let upper = side_rating_probs(&dist, &params.tp, params.c, true);
                let row = stim_idx * k + level;
                for j in 0..l {
                    probs[(row, j)] = p_minus * lower[j];
                    probs[(row, l + j)] = (1.0 - p_minus) * upper[j];
                }
            }
        }
        Ok(probs)
    }

    fn grid_candidates(&self, anchors: &EmpiricalAnchors) -> Vec<Theta> {
        let mut candidates = Vec::new();
        for &sd in D_SCALES.iter() {
            for &sc in CRIT_SCALES.iter() {
                let d = scaled_d(anchors, sd);
                let (c, tm, tp) = scaled_criteria(anchors, sc);
                let mut natural = d;
                natural.push(c);
                natural.extend(tm);
                natural.extend(tp);
                if let Ok(theta) = self.transform(&Theta::from(natural)) {
                    candidates.push(theta);
                }
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The transform round-trip law for SDT.
    // - Normalization and symmetry of predicted cell probabilities.
    // - Grid-candidate construction from empirical anchors.
    //
    // They intentionally DO NOT cover:
    // - Parameter recovery, exercised by the integration pipeline tests.
    // -------------------------------------------------------------------------

    fn model() -> Sdt {
        Sdt::new(Design { n_levels: 1, n_ratings: 4 })
    }

    #[test]
    // Purpose
    // -------
    // untransform(transform(p)) == p within floating-point tolerance.
    //
    // Given
    // -----
    // - A valid natural vector: d = 1.5, c = 0.1, three criteria per side.
    //
    // Expect
    // ------
    // - Elementwise agreement within 1e-9.
    fn transform_round_trip() {
        let natural = array![1.5, 0.1, -1.8, -1.0, -0.3, 0.5, 1.2, 2.0];
        let m = model();
        let theta = m.transform(&natural).expect("valid natural vector");
        let back = m.untransform(&theta).expect("matching length");
        for (a, b) in natural.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9, "round trip mismatch: {a} vs {b}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Each condition row of predict() is a proper distribution, and with a
    // symmetric parameter set the two stimulus rows mirror each other.
    //
    // Given
    // -----
    // - d = 1.5, c = 0, symmetric criteria.
    //
    // Expect
    // ------
    // - Rows sum to 1; P(cell | s = −1) equals the mirrored P(cell | s = +1).
    fn predict_rows_normalize_and_mirror() {
        let natural = array![1.5, 0.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5];
        let m = model();
        let probs = m.predict(&natural).expect("valid natural vector");
        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        let l = 4;
        for j in 0..2 * l {
            let mirrored = 2 * l - 1 - j;
            assert!(
                (probs[(0, j)] - probs[(1, mirrored)]).abs() < 1e-9,
                "mirror symmetry violated at cell {j}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Grid candidates are non-empty, finite, and live in unconstrained space
    // with the model's dimensionality.
    //
    // Given
    // -----
    // - Anchors with d̂ = 1.0 and an evenly spaced criteria chain.
    //
    // Expect
    // ------
    // - 9 candidates (3 sensitivity × 3 spread scales) of length k.
    fn grid_candidates_are_well_formed() {
        let anchors = EmpiricalAnchors {
            d_hat: vec![1.0],
            chain: vec![-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5],
        };
        let m = model();
        let candidates = m.grid_candidates(&anchors);
        assert_eq!(candidates.len(), 9);
        for candidate in &candidates {
            assert_eq!(candidate.len(), m.n_params());
            assert!(candidate.iter().all(|v| v.is_finite()));
        }
    }
}

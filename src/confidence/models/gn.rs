//! Gaussian-noise model: confidence reads the evidence through added noise.
//!
//! Choice follows the type-1 evidence x as in SDT; the confidence variable
//! y carries additional Gaussian noise, y ~ N(s·d_k/2, 1 + σ²), and is
//! judged against the shared criteria chain renormalized within the chosen
//! response side. Every cell stays a difference of (truncated) normal CDF
//! values, and σ → 0 recovers SDT.
//!
//! Parameters: d₁…d_K, c, σ, criteria; k = K + 2L.

use ndarray::Array2;

use crate::confidence::{
    core::{Design, EmpiricalAnchors},
    errors::ModelResult,
    models::{
        layout::{self, CriteriaStyle, ExtraKind},
        prob::{normal, side_minus_prob, side_rating_probs},
        scaled_criteria, scaled_d, ConfidenceModel, ModelKind,
    },
};
use crate::optimization::simplex::Theta;

const EXTRAS: &[ExtraKind] = &[ExtraKind::Positive];
const D_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const CRIT_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const SIGMA_GRID: [f64; 3] = [0.5, 1.0, 2.0];

/// Gaussian confidence-noise model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaussianNoise {
    design: Design,
}

impl GaussianNoise {
    pub fn new(design: Design) -> Self {
        Self { design }
    }
}

impl ConfidenceModel for GaussianNoise {
    fn kind(&self) -> ModelKind {
        ModelKind::Gn
    }

    fn design(&self) -> Design {
        self.design
    }

    fn n_params(&self) -> usize {
        layout::layout_len(self.design.n_levels, self.design.n_ratings, 1)
    }

    fn param_names(&self) -> Vec<String> {
        layout::layout_names(self.design.n_levels, self.design.n_ratings, &["sigma"])
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
        let sigma = params.extras[0];
        let tau = (1.0 + sigma * sigma).sqrt();
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let mu = s * params.d[level] / 2.0;
                let type1 = normal(mu, 1.0)?;
                let conf = normal(mu, tau)?;
                let p_minus = side_minus_prob(&type1, params.c);
                let lower = side_rating_probs(&conf, &params.tm, params.c, false);
                let upper = side_rating_probs(&conf, &params.tp, params.c, true);
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
                for &sigma in SIGMA_GRID.iter() {
                    let d = scaled_d(anchors, sd);
                    let (c, tm, tp) = scaled_criteria(anchors, sc);
                    let mut natural = d;
                    natural.push(c);
                    natural.push(sigma);
                    natural.extend(tm);
                    natural.extend(tp);
                    if let Ok(theta) = self.transform(&Theta::from(natural)) {
                        candidates.push(theta);
                    }
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
    // - Transform round trip including the positive σ coordinate.
    // - Row normalization of predict() and the SDT limit as σ → 0.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // untransform(transform(p)) == p, σ included.
    //
    // Given
    // -----
    // - d = 1.2, c = −0.1, σ = 0.7, two criteria per side (L = 3).
    //
    // Expect
    // ------
    // - Elementwise agreement within 1e-9.
    fn transform_round_trip() {
        let m = GaussianNoise::new(Design { n_levels: 1, n_ratings: 3 });
        let natural = array![1.2, -0.1, 0.7, -1.4, -0.6, 0.4, 1.1];
        let theta = m.transform(&natural).expect("valid natural vector");
        let back = m.untransform(&theta).expect("matching length");
        for (a, b) in natural.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Rows of predict() normalize, and with a tiny σ the GN prediction
    // agrees with SDT at the same core parameters (nesting).
    //
    // Given
    // -----
    // - Shared d/c/criteria; σ = 1e-6.
    //
    // Expect
    // ------
    // - Row sums 1; max |GN − SDT| below 1e-4.
    fn nests_sdt_as_sigma_vanishes() {
        let design = Design { n_levels: 1, n_ratings: 3 };
        let gn = GaussianNoise::new(design);
        let natural_gn = array![1.2, -0.1, 1e-6, -1.4, -0.6, 0.4, 1.1];
        let probs_gn = gn.predict(&natural_gn).expect("valid");
        for row in probs_gn.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }

        let sdt = crate::confidence::models::sdt::Sdt::new(design);
        let natural_sdt = array![1.2, -0.1, -1.4, -0.6, 0.4, 1.1];
        let probs_sdt = sdt.predict(&natural_sdt).expect("valid");
        for (a, b) in probs_gn.iter().zip(probs_sdt.iter()) {
            assert!((a - b).abs() < 1e-4, "GN with σ≈0 should match SDT: {a} vs {b}");
        }
    }
}

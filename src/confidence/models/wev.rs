//! Weighted evidence and visibility model.
//!
//! Confidence reflects a weighted combination of the choice-relevant
//! evidence and the perceived stimulus reliability (visibility): conditional
//! on response R, the confidence variable is
//!
//! ```text
//! y ~ N((1−w)·s·d_k/2 + w·R·d_k/2, σ²)
//! ```
//!
//! The visibility term pulls y toward the chosen side, so clearly visible
//! stimuli support high confidence even on errors — the signature WEV
//! pattern. Ratings are judged against the shared criteria chain
//! renormalized within the chosen response side. w → 0 recovers GN-style
//! pure-evidence confidence; w → 1 makes confidence track visibility alone.
//!
//! Parameters: d₁…d_K, c, w ∈ (0,1), σ > 0, criteria; k = K + 2L + 1.

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

const EXTRAS: &[ExtraKind] = &[ExtraKind::UnitInterval, ExtraKind::Positive];
const D_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const CRIT_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const W_GRID: [f64; 3] = [0.25, 0.5, 0.75];
const SIGMA_GRID: [f64; 2] = [0.5, 1.5];

/// Weighted evidence-and-visibility model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wev {
    design: Design,
}

impl Wev {
    pub fn new(design: Design) -> Self {
        Self { design }
    }
}

impl ConfidenceModel for Wev {
    fn kind(&self) -> ModelKind {
        ModelKind::Wev
    }

    fn design(&self) -> Design {
        self.design
    }

    fn n_params(&self) -> usize {
        layout::layout_len(self.design.n_levels, self.design.n_ratings, 2)
    }

    fn param_names(&self) -> Vec<String> {
        layout::layout_names(self.design.n_levels, self.design.n_ratings, &["w", "sigma"])
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
        let w = params.extras[0];
        let sigma = params.extras[1];
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let d = params.d[level];
                let evidence = (1.0 - w) * s * d / 2.0;
                let type1 = normal(s * d / 2.0, 1.0)?;
                let conf_minus = normal(evidence - w * d / 2.0, sigma)?;
                let conf_plus = normal(evidence + w * d / 2.0, sigma)?;
                let p_minus = side_minus_prob(&type1, params.c);
                let lower = side_rating_probs(&conf_minus, &params.tm, params.c, false);
                let upper = side_rating_probs(&conf_plus, &params.tp, params.c, true);
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
                for &w in W_GRID.iter() {
                    for &sigma in SIGMA_GRID.iter() {
                        let d = scaled_d(anchors, sd);
                        let (c, tm, tp) = scaled_criteria(anchors, sc);
                        let mut natural = d;
                        natural.push(c);
                        natural.push(w);
                        natural.push(sigma);
                        natural.extend(tm);
                        natural.extend(tp);
                        if let Ok(theta) = self.transform(&Theta::from(natural)) {
                            candidates.push(theta);
                        }
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
    // - Transform round trip including the logit-mapped weight.
    // - Row normalization and the WEV signature: at high visibility weight,
    //   errors on easy trials still attract high confidence.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // untransform(transform(p)) == p with w on the logit scale.
    //
    // Given
    // -----
    // - d = 1.3, c = 0.0, w = 0.35, σ = 0.9, L = 3 criteria.
    //
    // Expect
    // ------
    // - Elementwise agreement within 1e-9.
    fn transform_round_trip() {
        let m = Wev::new(Design { n_levels: 1, n_ratings: 3 });
        let natural = array![1.3, 0.0, 0.35, 0.9, -1.2, -0.5, 0.6, 1.3];
        let theta = m.transform(&natural).expect("valid natural vector");
        let back = m.untransform(&theta).expect("matching length");
        for (a, b) in natural.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // With a large visibility weight, the confidence distribution of
    // erroneous responses shifts upward relative to a pure-evidence model.
    //
    // Given
    // -----
    // - Easy stimulus (d = 3), w = 0.05 vs w = 0.9; error cell = stimulus +1
    //   answered −1 with the top rating.
    //
    // Expect
    // ------
    // - Rows normalize; the high-confidence-error probability, conditional on
    //   an error, is larger under w = 0.9.
    fn visibility_weight_raises_error_confidence() {
        let m = Wev::new(Design { n_levels: 1, n_ratings: 3 });
        let low_w = array![3.0, 0.0, 0.05, 0.8, -1.2, -0.5, 0.5, 1.2];
        let high_w = array![3.0, 0.0, 0.9, 0.8, -1.2, -0.5, 0.5, 1.2];
        let p_low = m.predict(&low_w).expect("valid");
        let p_high = m.predict(&high_w).expect("valid");
        for row in p_low.rows().into_iter().chain(p_high.rows()) {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        // stimulus +1 (row 1), response −1 cells are columns 0..3; rating 3
        // is column 2; normalize within the error side.
        let err_low: f64 = (0..3).map(|j| p_low[(1, j)]).sum();
        let err_high: f64 = (0..3).map(|j| p_high[(1, j)]).sum();
        assert!(p_high[(1, 2)] / err_high > p_low[(1, 2)] / err_low);
    }
}

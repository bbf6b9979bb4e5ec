//! Independent Gaussian model: confidence from a second, independent sample.
//!
//! The confidence variable never sees the decision sample: y ~ N(s·m·d_k/2, 1)
//! independent of x, with its own per-side rating criteria partitioning the
//! whole evidence axis (no truncation at c — the criteria blocks are free
//! ordered chains). m scales how much stimulus information the confidence
//! channel receives; m = 1 matches the primary channel.
//!
//! Parameters: d₁…d_K, c, m, two free criteria chains; k = K + 2L.

use ndarray::Array2;

use crate::confidence::{
    core::{Design, EmpiricalAnchors},
    errors::ModelResult,
    models::{
        layout::{self, CriteriaStyle, ExtraKind},
        prob::{full_line_rating_probs, normal, side_minus_prob},
        scaled_criteria, scaled_d, ConfidenceModel, ModelKind,
    },
};
use crate::optimization::simplex::Theta;

const EXTRAS: &[ExtraKind] = &[ExtraKind::Positive];
const D_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const CRIT_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const M_GRID: [f64; 3] = [0.5, 1.0, 2.0];

/// Independent-Gaussian confidence model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndependentGaussian {
    design: Design,
}

impl IndependentGaussian {
    pub fn new(design: Design) -> Self {
        Self { design }
    }
}

impl ConfidenceModel for IndependentGaussian {
    fn kind(&self) -> ModelKind {
        ModelKind::Ig
    }

    fn design(&self) -> Design {
        self.design
    }

    fn n_params(&self) -> usize {
        layout::layout_len(self.design.n_levels, self.design.n_ratings, 1)
    }

    fn param_names(&self) -> Vec<String> {
        layout::layout_names(self.design.n_levels, self.design.n_ratings, &["m"])
    }

    fn transform(&self, natural: &Theta) -> ModelResult<Theta> {
        let theta = layout::transform_natural(
            &natural.to_vec(),
            self.design.n_levels,
            self.design.n_ratings,
            EXTRAS,
            CriteriaStyle::Free,
        )?;
        Ok(Theta::from(theta))
    }

    fn untransform(&self, theta: &Theta) -> ModelResult<Theta> {
        let natural = layout::untransform_natural(
            &theta.to_vec(),
            self.design.n_levels,
            self.design.n_ratings,
            EXTRAS,
            CriteriaStyle::Free,
        )?;
        Ok(Theta::from(natural))
    }

    fn predict(&self, natural: &Theta) -> ModelResult<Array2<f64>> {
        let k = self.design.n_levels;
        let l = self.design.n_ratings;
        let params = layout::validate(&natural.to_vec(), k, l, EXTRAS, CriteriaStyle::Free)?;
        let m = params.extras[0];
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let type1 = normal(s * params.d[level] / 2.0, 1.0)?;
                let conf = normal(s * m * params.d[level] / 2.0, 1.0)?;
                let p_minus = side_minus_prob(&type1, params.c);
                let lower = full_line_rating_probs(&conf, &params.tm, false);
                let upper = full_line_rating_probs(&conf, &params.tp, true);
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
                for &m in M_GRID.iter() {
                    let d = scaled_d(anchors, sd);
                    let (c, tm, tp) = scaled_criteria(anchors, sc);
                    let mut natural = d;
                    natural.push(c);
                    natural.push(m);
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
    // - Transform round trip with free criteria chains.
    // - Row normalization and independence: rating distribution within a
    //   side does not depend on the decision criterion c.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // untransform(transform(p)) == p for the Free criteria style.
    //
    // Given
    // -----
    // - Criteria chains that straddle c on both sides (legal here).
    //
    // Expect
    // ------
    // - Elementwise agreement within 1e-9.
    fn transform_round_trip() {
        let m = IndependentGaussian::new(Design { n_levels: 1, n_ratings: 3 });
        let natural = array![1.1, 0.4, 0.8, -0.9, 0.6, -0.2, 0.9];
        let theta = m.transform(&natural).expect("valid natural vector");
        let back = m.untransform(&theta).expect("matching length");
        for (a, b) in natural.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Rows normalize and the conditional rating distribution within a
    // response side is invariant to c (the confidence channel is
    // independent).
    //
    // Given
    // -----
    // - Two parameter vectors differing only in c.
    //
    // Expect
    // ------
    // - Row sums 1; conditional rating probabilities on the +1 side agree.
    fn rating_distribution_independent_of_c() {
        let m = IndependentGaussian::new(Design { n_levels: 1, n_ratings: 3 });
        let a = array![1.1, 0.0, 1.0, -0.9, 0.6, -0.2, 0.9];
        let b = array![1.1, 0.6, 1.0, -0.9, 0.6, -0.2, 0.9];
        let pa = m.predict(&a).expect("valid");
        let pb = m.predict(&b).expect("valid");
        for row in pa.rows().into_iter().chain(pb.rows()) {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        let side = |p: &ndarray::Array2<f64>, j: usize| {
            let total: f64 = (3..6).map(|col| p[(1, col)]).sum();
            p[(1, 3 + j)] / total
        };
        for j in 0..3 {
            assert!((side(&pa, j) - side(&pb, j)).abs() < 1e-9);
        }
    }
}

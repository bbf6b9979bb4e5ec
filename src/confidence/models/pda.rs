//! Post-decisional accumulation model.
//!
//! After the choice, evidence accumulation continues for a fractional
//! period b, so the confidence variable pools more signal than the
//! decision did: y ~ N(s·(1+b)·d_k/2, 1+b), judged against the criteria
//! chain renormalized within the chosen response side. b → 0 recovers SDT;
//! large b makes confidence better informed than the choice.
//!
//! Parameters: d₁…d_K, c, b, criteria; k = K + 2L.

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
const B_GRID: [f64; 3] = [0.5, 1.0, 2.0];

/// Post-decisional accumulation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pda {
    design: Design,
}

impl Pda {
    pub fn new(design: Design) -> Self {
        Self { design }
    }
}

impl ConfidenceModel for Pda {
    fn kind(&self) -> ModelKind {
        ModelKind::Pda
    }

    fn design(&self) -> Design {
        self.design
    }

    fn n_params(&self) -> usize {
        layout::layout_len(self.design.n_levels, self.design.n_ratings, 1)
    }

    fn param_names(&self) -> Vec<String> {
        layout::layout_names(self.design.n_levels, self.design.n_ratings, &["b"])
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
        let b = params.extras[0];
        let tau = (1.0 + b).sqrt();
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let mu = s * params.d[level] / 2.0;
                let type1 = normal(mu, 1.0)?;
                let conf = normal(s * (1.0 + b) * params.d[level] / 2.0, tau)?;
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
                for &b in B_GRID.iter() {
                    let d = scaled_d(anchors, sd);
                    let (c, tm, tp) = scaled_criteria(anchors, sc);
                    let mut natural = d;
                    natural.push(c);
                    natural.push(b);
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
    // - Transform round trip and predict() normalization.
    // - Post-decisional sharpening: more accumulation concentrates confidence
    //   of correct responses in higher ratings.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // untransform(transform(p)) == p, b included.
    //
    // Given
    // -----
    // - d = 1.0, c = 0.2, b = 1.5, L = 3 criteria.
    //
    // Expect
    // ------
    // - Elementwise agreement within 1e-9.
    fn transform_round_trip() {
        let m = Pda::new(Design { n_levels: 1, n_ratings: 3 });
        let natural = array![1.0, 0.2, 1.5, -1.0, -0.4, 0.8, 1.4];
        let theta = m.transform(&natural).expect("valid natural vector");
        let back = m.untransform(&theta).expect("matching length");
        for (a, b) in natural.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Rows normalize, and raising b shifts correct-response mass toward the
    // top rating (confidence outruns the choice).
    //
    // Given
    // -----
    // - Identical core parameters with b = 0.1 vs b = 3.0.
    //
    // Expect
    // ------
    // - Row sums 1; P(top rating, correct side | s = +1) grows with b.
    fn accumulation_sharpens_confidence() {
        let m = Pda::new(Design { n_levels: 1, n_ratings: 3 });
        let low_b = array![1.0, 0.0, 0.1, -1.0, -0.4, 0.4, 1.0];
        let high_b = array![1.0, 0.0, 3.0, -1.0, -0.4, 0.4, 1.0];
        let p_low = m.predict(&low_b).expect("valid");
        let p_high = m.predict(&high_b).expect("valid");
        for row in p_low.rows().into_iter().chain(p_high.rows()) {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
        // stimulus +1 row is index 1; top-rating correct cell is the last column.
        assert!(p_high[(1, 5)] > p_low[(1, 5)]);
    }
}

//! Independent truncated-Gaussian models — the meta-d′ generative family.
//!
//! The confidence variable is an independent sample y ~ N(s·m·d_k/2, 1)
//! truncated to the chosen response side, so the rating cells are truncated
//! normal CDF differences. Two variants differ in where the confidence
//! criteria live:
//!
//! - **ITGc** (`scale_with_m = false`): truncation at c and rating criteria
//!   on the type-1 scale — consistent with the Maniscalco–Lau ("ML")
//!   meta-d′ specification.
//! - **ITGcm** (`scale_with_m = true`): truncation at m·c and criteria
//!   scaled to m·θ — consistent with Fleming's ("F") specification, where
//!   the metacognitive observer's criteria shift with its sensitivity.
//!
//! With m = 1, either variant reproduces the SDT rating distribution in
//! expectation, which is what makes the fitted m interpretable as
//! meta-d′/d′.
//!
//! Parameters: d₁…d_K, c, m, criteria; k = K + 2L.

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
const M_GRID: [f64; 3] = [0.5, 1.0, 2.0];

/// Independent truncated-Gaussian model (ML- or Fleming-consistent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndependentTruncGaussian {
    design: Design,
    scale_with_m: bool,
}

impl IndependentTruncGaussian {
    pub fn new(design: Design, scale_with_m: bool) -> Self {
        Self { design, scale_with_m }
    }

    /// Truncation point and criteria on the confidence-variable scale.
    fn meta_geometry(&self, c: f64, tm: &[f64], tp: &[f64], m: f64) -> (f64, Vec<f64>, Vec<f64>) {
        if self.scale_with_m {
            (m * c, tm.iter().map(|&v| m * v).collect(), tp.iter().map(|&v| m * v).collect())
        } else {
            (c, tm.to_vec(), tp.to_vec())
        }
    }
}

impl ConfidenceModel for IndependentTruncGaussian {
    fn kind(&self) -> ModelKind {
        if self.scale_with_m { ModelKind::Itgcm } else { ModelKind::Itgc }
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
        let m = params.extras[0];
        let (cut, tm, tp) = self.meta_geometry(params.c, &params.tm, &params.tp, m);
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let type1 = normal(s * params.d[level] / 2.0, 1.0)?;
                let conf = normal(s * m * params.d[level] / 2.0, 1.0)?;
                let p_minus = side_minus_prob(&type1, params.c);
                let lower = side_rating_probs(&conf, &tm, cut, false);
                let upper = side_rating_probs(&conf, &tp, cut, true);
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
    // - Transform round trip shared by both variants.
    // - The m = 1 consistency law: both variants reproduce SDT exactly.
    // - Divergence of the two variants once m ≠ 1 and c ≠ 0.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // untransform(transform(p)) == p for the truncated family.
    //
    // Given
    // -----
    // - d = 1.4, c = 0.3, m = 0.8, L = 3 criteria around c.
    //
    // Expect
    // ------
    // - Elementwise agreement within 1e-9.
    fn transform_round_trip() {
        let m = IndependentTruncGaussian::new(Design { n_levels: 1, n_ratings: 3 }, true);
        let natural = array![1.4, 0.3, 0.8, -0.8, -0.2, 0.9, 1.6];
        let theta = m.transform(&natural).expect("valid natural vector");
        let back = m.untransform(&theta).expect("matching length");
        for (a, b) in natural.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // At m = 1 the independent truncated-Gaussian prediction coincides with
    // SDT for both variants (the meta-observer equals the observer).
    //
    // Given
    // -----
    // - Shared d/c/criteria, m = 1.
    //
    // Expect
    // ------
    // - Max |ITG − SDT| below 1e-9 for ITGc and ITGcm alike.
    fn m_of_one_reproduces_sdt() {
        let design = Design { n_levels: 1, n_ratings: 3 };
        let sdt = crate::confidence::models::sdt::Sdt::new(design);
        let natural_sdt = array![1.4, 0.3, -0.8, -0.2, 0.9, 1.6];
        let probs_sdt = sdt.predict(&natural_sdt).expect("valid");
        for scale_with_m in [false, true] {
            let itg = IndependentTruncGaussian::new(design, scale_with_m);
            let natural = array![1.4, 0.3, 1.0, -0.8, -0.2, 0.9, 1.6];
            let probs = itg.predict(&natural).expect("valid");
            for (a, b) in probs.iter().zip(probs_sdt.iter()) {
                assert!((a - b).abs() < 1e-9, "variant {scale_with_m}: {a} vs {b}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // With m ≠ 1 and a biased criterion the ML and Fleming geometries make
    // different predictions — the variants are genuinely distinct models.
    //
    // Given
    // -----
    // - m = 0.5, c = 0.4, otherwise shared parameters.
    //
    // Expect
    // ------
    // - The two predicted tables differ in at least one cell by > 1e-4.
    fn variants_diverge_off_unit_m() {
        let design = Design { n_levels: 1, n_ratings: 3 };
        let natural = array![1.4, 0.4, 0.5, -0.8, -0.2, 0.9, 1.6];
        let ml = IndependentTruncGaussian::new(design, false).predict(&natural).expect("valid");
        let fl = IndependentTruncGaussian::new(design, true).predict(&natural).expect("valid");
        let max_diff = ml
            .iter()
            .zip(fl.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        assert!(max_diff > 1e-4, "variants should diverge, max diff {max_diff}");
    }
}

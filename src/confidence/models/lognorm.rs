//! Lognormal-noise models (logN and logWEV).
//!
//! Confidence is carried by the criterion distance D = R·(x − c) judged on a
//! multiplicative-noise scale: D ~ LogNormal(μ_D, σ²) with per-side positive
//! ordered criteria partitioning (0, ∞), so cells are lognormal CDF
//! differences. The location term distinguishes the variants:
//!
//! - **logN**: μ_D = R·(s·d_k/2 − c) — the expected signed distance of the
//!   evidence from the criterion.
//! - **logWEV** (`weighted = true`): μ_D = (1−w)·R·(s·d_k/2 − c) + w·d_k —
//!   the WEV mixture of distance and visibility on the log scale.
//!
//! Correct responses have larger μ_D and hence stochastically larger
//! confidence; errors on easy trials keep substantial confidence under
//! logWEV through the visibility term.
//!
//! Parameters: d₁…d_K, c, (w,) σ, two positive criteria chains;
//! k = K + 2L (logN) or K + 2L + 1 (logWEV).

use ndarray::Array2;

use crate::confidence::{
    core::{Design, EmpiricalAnchors},
    errors::ModelResult,
    models::{
        distance_chains,
        layout::{self, CriteriaStyle, ExtraKind},
        prob::{distance_rating_probs, log_normal, normal, side_minus_prob},
        scaled_criteria, scaled_d, ConfidenceModel, ModelKind,
    },
};
use crate::optimization::simplex::Theta;

const LOGN_EXTRAS: &[ExtraKind] = &[ExtraKind::Positive];
const LOGWEV_EXTRAS: &[ExtraKind] = &[ExtraKind::UnitInterval, ExtraKind::Positive];
const D_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const CRIT_SCALES: [f64; 3] = [0.5, 1.0, 2.0];
const SIGMA_GRID: [f64; 3] = [0.5, 1.0, 2.0];
const W_GRID: [f64; 3] = [0.25, 0.5, 0.75];

/// Lognormal confidence-noise model, plain or visibility-weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogNorm {
    design: Design,
    weighted: bool,
}

impl LogNorm {
    pub fn new(design: Design, weighted: bool) -> Self {
        Self { design, weighted }
    }

    fn extras(&self) -> &'static [ExtraKind] {
        if self.weighted { LOGWEV_EXTRAS } else { LOGN_EXTRAS }
    }

    fn extra_names(&self) -> &'static [&'static str] {
        if self.weighted { &["w", "sigma"] } else { &["sigma"] }
    }
}

impl ConfidenceModel for LogNorm {
    fn kind(&self) -> ModelKind {
        if self.weighted { ModelKind::LogWev } else { ModelKind::LogN }
    }

    fn design(&self) -> Design {
        self.design
    }

    fn n_params(&self) -> usize {
        layout::layout_len(self.design.n_levels, self.design.n_ratings, self.extras().len())
    }

    fn param_names(&self) -> Vec<String> {
        layout::layout_names(self.design.n_levels, self.design.n_ratings, self.extra_names())
    }

    fn transform(&self, natural: &Theta) -> ModelResult<Theta> {
        let theta = layout::transform_natural(
            &natural.to_vec(),
            self.design.n_levels,
            self.design.n_ratings,
            self.extras(),
            CriteriaStyle::PositiveDistance,
        )?;
        Ok(Theta::from(theta))
    }

    fn untransform(&self, theta: &Theta) -> ModelResult<Theta> {
        let natural = layout::untransform_natural(
            &theta.to_vec(),
            self.design.n_levels,
            self.design.n_ratings,
            self.extras(),
            CriteriaStyle::PositiveDistance,
        )?;
        Ok(Theta::from(natural))
    }

    fn predict(&self, natural: &Theta) -> ModelResult<Array2<f64>> {
        let k = self.design.n_levels;
        let l = self.design.n_ratings;
        let params = layout::validate(
            &natural.to_vec(),
            k,
            l,
            self.extras(),
            CriteriaStyle::PositiveDistance,
        )?;
        let (w, sigma) = if self.weighted {
            (params.extras[0], params.extras[1])
        } else {
            (0.0, params.extras[0])
        };
        let mut probs = Array2::zeros((2 * k, 2 * l));
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let d = params.d[level];
                let type1 = normal(s * d / 2.0, 1.0)?;
                let p_minus = side_minus_prob(&type1, params.c);
                let row = stim_idx * k + level;
                for (resp_idx, r) in [(0usize, -1.0f64), (1, 1.0)] {
                    let distance = r * (s * d / 2.0 - params.c);
                    let location = (1.0 - w) * distance + w * d;
                    let dist = log_normal(location, sigma)?;
                    let interior = if resp_idx == 0 { &params.tm } else { &params.tp };
                    let ratings = distance_rating_probs(&dist, interior);
                    let p_side = if resp_idx == 0 { p_minus } else { 1.0 - p_minus };
                    for j in 0..l {
                        probs[(row, resp_idx * l + j)] = p_side * ratings[j];
                    }
                }
            }
        }
        Ok(probs)
    }

    fn grid_candidates(&self, anchors: &EmpiricalAnchors) -> Vec<Theta> {
        let mut candidates = Vec::new();
        let w_grid: &[f64] = if self.weighted { &W_GRID } else { &[0.0] };
        for &sd in D_SCALES.iter() {
            for &sc in CRIT_SCALES.iter() {
                for &sigma in SIGMA_GRID.iter() {
                    for &w in w_grid.iter() {
                        let d = scaled_d(anchors, sd);
                        let (c, tm, tp) = scaled_criteria(anchors, sc);
                        let (qm, qp) = distance_chains(c, &tm, &tp);
                        let mut natural = d;
                        natural.push(c);
                        if self.weighted {
                            natural.push(w);
                        }
                        natural.push(sigma);
                        natural.extend(qm);
                        natural.extend(qp);
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

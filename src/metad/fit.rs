//! metad::fit — stage-2 estimation of metacognitive efficiency.
//!
//! Purpose
//! -------
//! Estimate meta-d′/d′ per participant by holding the closed-form type-1
//! parameters fixed (stage 1, [`Type1Outcome`]) and optimizing the
//! metacognitive-efficiency parameter m together with the confidence
//! criteria against a truncated-Gaussian likelihood (stage 2), reusing the
//! same grid-search + multi-restart simplex machinery as the general
//! fitter.
//!
//! Key behaviors
//! -------------
//! - Stage 2 maximizes the conditional likelihood of the rating cells given
//!   the response; the type-1 side probabilities are fixed by stage 1 and
//!   drop out of the objective.
//! - Variant [`MetaDVariant::MaximumLikelihood`] ("ML") truncates the
//!   confidence variable at c_k with criteria c_k + δ; variant
//!   [`MetaDVariant::Fleming`] ("F") expresses truncation and criteria
//!   relative to m·c_k instead.
//! - The criterion offsets δ are shared across difficulty levels and
//!   anchored per level, so K = 1 reduces to the classic procedure.
//! - Per-participant numerical degeneracy yields NaN metaD/Ratio on that
//!   row; it never aborts the batch.
//!
//! Output per participant: {model, participant, dprime, c, metaD = m·d′,
//! Ratio = metaD/d′}.

use std::fmt;
use std::str::FromStr;

use crate::confidence::{
    core::{CountTable, Execution, TrialData},
    errors::{ConfError, ConfResult},
    fit::dispatch::run_jobs,
    models::prob::{normal, side_rating_probs},
};
use crate::optimization::{
    errors::{OptError, OptResult},
    numerical_stability::transformations::{safe_exp, safe_ln, PROB_FLOOR},
    simplex::{multistart, rank_initializers, NegLogLikelihood, SimplexOptions, Theta},
};

use super::type1::Type1Outcome;

const M_GRID: [f64; 6] = [0.25, 0.5, 0.75, 1.0, 1.5, 2.0];
const SPREAD_GRID: [f64; 3] = [0.5, 1.0, 2.0];

/// Which meta-d′ specification stage 2 follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaDVariant {
    /// Maniscalco–Lau: criteria and truncation on the type-1 scale.
    MaximumLikelihood,
    /// Fleming: criteria and truncation relative to m·c.
    Fleming,
}

impl MetaDVariant {
    pub fn name(&self) -> &'static str {
        match self {
            MetaDVariant::MaximumLikelihood => "ML",
            MetaDVariant::Fleming => "F",
        }
    }
}

impl fmt::Display for MetaDVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MetaDVariant {
    type Err = ConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            _ if s.eq_ignore_ascii_case("ML") => Ok(MetaDVariant::MaximumLikelihood),
            _ if s.eq_ignore_ascii_case("F") => Ok(MetaDVariant::Fleming),
            _ => Err(ConfError::UnknownModel { name: s.to_string() }),
        }
    }
}

/// Per-participant meta-d′ report row.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaDOutcome {
    pub model: MetaDVariant,
    pub participant: u32,
    pub dprime: f64,
    pub criterion: f64,
    pub meta_d: f64,
    pub ratio: f64,
}

/// Stage-2 objective: rating likelihood with type-1 parameters fixed.
///
/// Unconstrained layout: `[ln m | log-gaps of δ⁻ outward from 0 |
/// log-gaps of δ⁺ outward from 0]`, dimension 1 + 2(L−1).
struct MetaDObjective<'a> {
    variant: MetaDVariant,
    type1: &'a Type1Outcome,
    n_ratings: usize,
}

impl MetaDObjective<'_> {
    fn dim(&self) -> usize {
        1 + 2 * (self.n_ratings - 1)
    }

    /// Decode θ into (m, δ⁻ ascending, δ⁺ ascending).
    fn decode(&self, theta: &Theta) -> (f64, Vec<f64>, Vec<f64>) {
        let l = self.n_ratings;
        let m = safe_exp(theta[0]);
        let mut dm = Vec::with_capacity(l - 1);
        let mut acc = 0.0;
        for &g in theta.iter().skip(1).take(l - 1) {
            acc -= safe_exp(g);
            dm.push(acc);
        }
        dm.reverse();
        let mut dp = Vec::with_capacity(l - 1);
        let mut acc = 0.0;
        for &g in theta.iter().skip(l) {
            acc += safe_exp(g);
            dp.push(acc);
        }
        (m, dm, dp)
    }
}

impl NegLogLikelihood for MetaDObjective<'_> {
    type Data = CountTable;

    fn value(&self, theta: &Theta, counts: &CountTable) -> OptResult<f64> {
        let (m, dm, dp) = self.decode(theta);
        let l = self.n_ratings;
        let k = counts.n_levels();
        let mut nll = 0.0;
        for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
            for level in 0..k {
                let d = self.type1.dprime()[level];
                let c = self.type1.criterion()[level];
                let anchor = match self.variant {
                    MetaDVariant::MaximumLikelihood => c,
                    MetaDVariant::Fleming => m * c,
                };
                let conf = normal(s * m * d / 2.0, 1.0).map_err(OptError::from)?;
                let tm: Vec<f64> = dm.iter().map(|&v| anchor + v).collect();
                let tp: Vec<f64> = dp.iter().map(|&v| anchor + v).collect();
                let lower = side_rating_probs(&conf, &tm, anchor, false);
                let upper = side_rating_probs(&conf, &tp, anchor, true);
                let row = stim_idx * k + level;
                for j in 0..l {
                    let count_minus = counts.counts()[(row, j)];
                    if count_minus > 0.0 {
                        nll -= count_minus * lower[j].max(PROB_FLOOR).ln();
                    }
                    let count_plus = counts.counts()[(row, l + j)];
                    if count_plus > 0.0 {
                        nll -= count_plus * upper[j].max(PROB_FLOOR).ln();
                    }
                }
            }
        }
        Ok(nll)
    }

    fn check(&self, theta: &Theta, _counts: &CountTable) -> OptResult<()> {
        if theta.len() != self.dim() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.dim(),
                actual: theta.len(),
            });
        }
        Ok(())
    }
}

/// Structured stage-2 grid: an m ladder crossed with criterion-offset
/// spreads derived from the participant's pooled rating proportions.
fn grid_candidates(counts: &CountTable) -> Vec<Theta> {
    let anchors = counts.anchors();
    let c_hat = anchors.c_hat();
    let l = counts.n_ratings();
    let mut candidates = Vec::new();
    for &m in M_GRID.iter() {
        for &spread in SPREAD_GRID.iter() {
            let mut theta = Vec::with_capacity(1 + 2 * (l - 1));
            theta.push(safe_ln(m));
            // δ⁻ gaps outward from 0, derived from the chain below ĉ.
            let mut prev = 0.0;
            for &v in anchors.chain[..l - 1].iter().rev() {
                let offset = (v - c_hat) * spread;
                theta.push(safe_ln(prev - offset));
                prev = offset;
            }
            let mut prev = 0.0;
            for &v in anchors.chain[l..].iter() {
                let offset = (v - c_hat) * spread;
                theta.push(safe_ln(offset - prev));
                prev = offset;
            }
            candidates.push(Theta::from(theta));
        }
    }
    candidates
}

/// Fit meta-d′/d′ for every participant.
///
/// Stage 1 is closed-form and always succeeds; stage 2 reuses the grid +
/// multi-restart machinery per participant. Jobs are dispatched under
/// `execution` and reported in ascending participant order regardless of
/// completion order.
///
/// # Errors
/// Only input/configuration errors reach the caller; stage-2 degeneracy is
/// reported as NaN metaD/Ratio on the affected row.
pub fn fit_meta_dprime(
    data: &TrialData, variant: MetaDVariant, opts: &SimplexOptions, execution: &Execution,
) -> ConfResult<Vec<MetaDOutcome>> {
    execution.validate()?;
    let tables: Vec<(u32, CountTable)> = data
        .participants()
        .into_iter()
        .map(|id| (id, CountTable::from_trials(data, id)))
        .collect();

    run_jobs(&tables, execution, |(participant, counts)| {
        fit_one(*participant, counts, variant, opts)
    })
}

fn fit_one(
    participant: u32, counts: &CountTable, variant: MetaDVariant, opts: &SimplexOptions,
) -> MetaDOutcome {
    let type1 = Type1Outcome::from_counts(counts);
    let dprime = type1.dprime_mean();
    let criterion = type1.criterion_mean();
    let objective =
        MetaDObjective { variant, type1: &type1, n_ratings: counts.n_ratings() };

    let candidates = grid_candidates(counts);
    let m = rank_initializers(&objective, counts, &candidates, opts.n_inits)
        .and_then(|inits| multistart(&objective, &inits, counts, opts))
        .map(|outcome| safe_exp(outcome.theta_hat[0]));

    let (meta_d, ratio) = match m {
        Ok(m) => (m * dprime, m),
        Err(_) => (f64::NAN, f64::NAN),
    };
    MetaDOutcome { model: variant, participant, dprime, criterion, meta_d, ratio }
}

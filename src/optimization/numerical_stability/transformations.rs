//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used to map
//! constrained model parameters (positive scales, probabilities, ordered
//! criterion chains) into the unconstrained optimizer space and back.
//! The functions here follow guarded strategies similar to those in major
//! ML libraries, using explicit cutoffs to keep `f64` arithmetic in a
//! well-conditioned regime.
//!
//! # Provided items
//! - [`PROB_FLOOR`]: lower floor applied to every cell probability before
//!   taking logarithms, keeping the negative log-likelihood finite.
//! - [`PENALTY`]: large finite value substituted for non-finite objective
//!   evaluations so the simplex solver never receives NaN/∞.
//! - [`GAP_FLOOR`]: smallest admissible gap between consecutive ordered
//!   criteria; gaps are floored before taking logs on the inverse map.
//! - [`safe_exp(x)`] / [`safe_ln(x)`]: clamped exponential/logarithm for the
//!   positive-parameter and ordered-increment transforms.
//! - [`safe_logistic(x)`] / [`safe_logit(p)`]: stable sigmoid pair for
//!   parameters constrained to (0, 1).
//! - Ordered-chain maps: [`chain_to_gaps`] / [`gaps_to_chain`] (first element
//!   free) and [`pos_chain_to_gaps`] / [`gaps_to_pos_chain`] (first element
//!   strictly positive).
//!
//! # Rationale
//! All models in the catalog are optimized in a fully unconstrained space;
//! ordering and positivity constraints are baked into these transforms so
//! the simplex solver can move freely without rejection sampling.

/// Floor applied to cell probabilities before `ln`.
///
/// A multinomial cell predicted at exactly zero probability while observed at
/// a positive count would make the negative log-likelihood infinite. Flooring
/// at 1e-10 keeps the objective finite and steeply penalized instead.
pub const PROB_FLOOR: f64 = 1e-10;

/// Large finite penalty substituted for non-finite objective values.
///
/// The Nelder–Mead solver compares objective values by ordering; any NaN in
/// that ordering poisons the simplex. Non-finite evaluations are replaced by
/// this sentinel so the solver keeps moving and abandons the region.
pub const PENALTY: f64 = 1e12;

/// Smallest admissible gap between consecutive ordered criteria.
///
/// Gaps are floored at this value before `ln` on the natural → unconstrained
/// map, so criterion chains that have collapsed to ties still transform to
/// finite coordinates.
pub const GAP_FLOOR: f64 = 1e-8;

/// Cap on exponent arguments used by [`safe_exp`].
///
/// `exp(±50)` spans (2e-22, 5.2e21) — far outside any plausible parameter
/// range but still strictly positive and comfortably finite, so downstream
/// arithmetic can neither underflow a scale to exactly zero nor produce
/// `inf - inf`.
const EXP_CAP: f64 = 50.0;

/// Clamped exponential: `exp(clamp(x, -EXP_CAP, EXP_CAP))`.
///
/// Used by the inverse transforms mapping unconstrained increments back to
/// positive gaps and scale parameters; the output is always strictly
/// positive and finite.
pub fn safe_exp(x: f64) -> f64 {
    x.clamp(-EXP_CAP, EXP_CAP).exp()
}

/// Guarded logarithm: `ln(max(x, GAP_FLOOR))`.
///
/// Used by the forward transforms mapping positive gaps and scale parameters
/// into unconstrained space.
pub fn safe_ln(x: f64) -> f64 {
    x.max(GAP_FLOOR).ln()
}

/// Numerically stable logistic function mapping ℝ → (0, 1).
///
/// Evaluates `1 / (1 + exp(-x))` through the branch that never exponentiates
/// a large positive argument, then clamps into `[GAP_FLOOR, 1 − GAP_FLOOR]`
/// so saturated optimizer coordinates can never round to exactly 0 or 1.
pub fn safe_logistic(x: f64) -> f64 {
    let p = if x >= 0.0 {
        let e = (-x).exp();
        1.0 / (1.0 + e)
    } else {
        let e = x.exp();
        e / (1.0 + e)
    };
    p.clamp(GAP_FLOOR, 1.0 - GAP_FLOOR)
}

/// Stable inverse of [`safe_logistic`] on (0, 1).
///
/// The input is clamped away from the endpoints so weights that have drifted
/// to 0 or 1 in natural space still map to finite coordinates.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(GAP_FLOOR, 1.0 - GAP_FLOOR);
    (p / (1.0 - p)).ln()
}

/// Map a strictly ascending chain to `[first, ln(gap_1), ln(gap_2), …]`.
///
/// The first element stays in natural units (its domain is all of ℝ); each
/// subsequent coordinate is the log of the gap to its predecessor, floored at
/// [`GAP_FLOOR`]. Inverse of [`gaps_to_chain`].
pub fn chain_to_gaps(chain: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(chain.len());
    for (i, &v) in chain.iter().enumerate() {
        if i == 0 {
            out.push(v);
        } else {
            out.push(safe_ln(v - chain[i - 1]));
        }
    }
    out
}

/// Rebuild a strictly ascending chain from `[first, ln(gap_1), …]`.
///
/// Cumulative-sum-of-positive-increments: each decoded gap is `safe_exp` of
/// its coordinate, so the output is ascending for every finite input.
pub fn gaps_to_chain(t: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(t.len());
    let mut acc = 0.0;
    for (i, &v) in t.iter().enumerate() {
        if i == 0 {
            acc = v;
        } else {
            acc += safe_exp(v);
        }
        out.push(acc);
    }
    out
}

/// Map a strictly positive ascending chain to `[ln(first), ln(gap_1), …]`.
///
/// Like [`chain_to_gaps`] but the first element is itself constrained to be
/// positive, so it is log-transformed too. Inverse of [`gaps_to_pos_chain`].
pub fn pos_chain_to_gaps(chain: &[f64]) -> Vec<f64> {
    let mut out = chain_to_gaps(chain);
    if let Some(first) = out.first_mut() {
        *first = safe_ln(chain[0]);
    }
    out
}

/// Rebuild a strictly positive ascending chain from `[ln(first), ln(gap_1), …]`.
pub fn gaps_to_pos_chain(t: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(t.len());
    let mut acc = 0.0;
    for &v in t {
        acc += safe_exp(v);
        out.push(acc);
    }
    out
}

//! metad::type1 — closed-form type-1 sensitivity and bias.
//!
//! Purpose
//! -------
//! Compute standard signal-detection type-1 statistics — sensitivity d′ and
//! criterion c — per difficulty level directly from observed hit and
//! false-alarm rates. No optimization is involved; given at least one
//! correct and one incorrect trial (guaranteed by input validation) the
//! computation always succeeds.
//!
//! Key behaviors
//! -------------
//! - Per level k: `d′_k = Φ⁻¹(HR_k) − Φ⁻¹(FAR_k)` and
//!   `c_k = −(Φ⁻¹(HR_k) + Φ⁻¹(FAR_k)) / 2`, where HR conditions on
//!   stimulus +1 and FAR on stimulus −1.
//! - Rates use the Hautus +0.5 cell correction, `(hits + 0.5)/(n + 1)`, so
//!   extreme rates stay interior and the quantile map stays finite.
//! - Scalar summaries are trial-weighted means across levels, matching the
//!   reduced per-participant output of the meta-d′ fitter.
//!
//! Conventions
//! -----------
//! - A "hit" is a +1 response to a +1 stimulus; a "false alarm" is a +1
//!   response to a −1 stimulus.
//! - Levels with no trials for one stimulus contribute a corrected rate of
//!   0.5 for that stimulus and weight equal to their total trial count.

use crate::confidence::core::{counts::std_normal, CountTable};
use statrs::distribution::ContinuousCDF;

/// Type1Outcome — closed-form type-1 statistics for one participant.
///
/// Holds per-level sensitivity and criterion plus their trial-weighted
/// means. Constructed via [`Type1Outcome::from_counts`]; cheap to copy
/// around (the per-level vectors are K-sized).
#[derive(Debug, Clone, PartialEq)]
pub struct Type1Outcome {
    dprime: Vec<f64>,
    criterion: Vec<f64>,
    dprime_mean: f64,
    criterion_mean: f64,
}

impl Type1Outcome {
    /// Compute type-1 statistics from a participant's count table.
    pub fn from_counts(counts: &CountTable) -> Self {
        let normal = std_normal();
        let k = counts.n_levels();
        let l = counts.n_ratings();
        let mut dprime = Vec::with_capacity(k);
        let mut criterion = Vec::with_capacity(k);
        let mut weights = Vec::with_capacity(k);
        for level in 1..=k {
            let mut n_plus = 0.0;
            let mut hits = 0.0;
            let mut n_minus = 0.0;
            let mut false_alarms = 0.0;
            let row_plus = counts.condition_row(1, level);
            let row_minus = counts.condition_row(-1, level);
            for rating in 1..=l {
                let col_plus = counts.cell_col(1, rating);
                let col_minus = counts.cell_col(-1, rating);
                hits += counts.counts()[(row_plus, col_plus)];
                false_alarms += counts.counts()[(row_minus, col_plus)];
                n_plus +=
                    counts.counts()[(row_plus, col_plus)] + counts.counts()[(row_plus, col_minus)];
                n_minus += counts.counts()[(row_minus, col_plus)]
                    + counts.counts()[(row_minus, col_minus)];
            }
            let hr = (hits + 0.5) / (n_plus + 1.0);
            let far = (false_alarms + 0.5) / (n_minus + 1.0);
            let z_hr = normal.inverse_cdf(hr);
            let z_far = normal.inverse_cdf(far);
            dprime.push(z_hr - z_far);
            criterion.push(-(z_hr + z_far) / 2.0);
            weights.push(n_plus + n_minus);
        }
        let total: f64 = weights.iter().sum();
        let weighted = |values: &[f64]| -> f64 {
            if total > 0.0 {
                values.iter().zip(weights.iter()).map(|(v, w)| v * w).sum::<f64>() / total
            } else {
                0.0
            }
        };
        let dprime_mean = weighted(&dprime);
        let criterion_mean = weighted(&criterion);
        Type1Outcome { dprime, criterion, dprime_mean, criterion_mean }
    }

    /// Per-level sensitivities d′₁…d′_K.
    pub fn dprime(&self) -> &[f64] {
        &self.dprime
    }

    /// Per-level criteria c₁…c_K.
    pub fn criterion(&self) -> &[f64] {
        &self.criterion
    }

    /// Trial-weighted mean sensitivity.
    pub fn dprime_mean(&self) -> f64 {
        self.dprime_mean
    }

    /// Trial-weighted mean criterion.
    pub fn criterion_mean(&self) -> f64 {
        self.criterion_mean
    }
}

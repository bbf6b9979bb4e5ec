//! Count aggregation — the sufficient statistic for all likelihoods.
//!
//! Purpose
//! -------
//! Reduce one participant's trials into the multinomial cell counts that
//! every model likelihood depends on, and derive the empirical anchors that
//! seed the structured grid search. Trial order is irrelevant once counts
//! are built; the table is constructed once per participant before the
//! model loop and immutable afterward.
//!
//! Key behaviors
//! -------------
//! - [`CountTable::from_trials`] maps each trial to its (stimulus,
//!   difficulty) condition row and (response, rating) cell column.
//! - [`CountTable::anchors`] converts per-condition accuracy into a
//!   sensitivity anchor via Φ⁻¹ and pooled cell proportions into an
//!   ascending criteria-chain anchor, both with a +0.5 cell correction so
//!   the quantile maps stay finite on sparse data.
//! - The table layout is public: the downstream information-theoretic
//!   collaborator consumes exactly this aggregate.
//!
//! Conventions
//! -----------
//! - Row index: `stim_idx · K + (level − 1)` with stim_idx 0 ↦ stimulus −1,
//!   1 ↦ +1.
//! - Column index: `resp_idx · L + (rating − 1)` with resp_idx 0 ↦ response
//!   −1, 1 ↦ +1.
//! - Counts are stored as `f64` because they are only ever consumed in
//!   floating-point accumulation.

use ndarray::Array2;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::confidence::core::data::TrialData;

/// Standard normal distribution used for quantile anchors and likelihoods.
///
/// `Normal::new(0, 1)` cannot fail; the expect documents that invariant.
pub(crate) fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("unit normal is always valid")
}

/// Sufficient multinomial statistic for one participant.
///
/// Rows enumerate (stimulus, difficulty) conditions, columns enumerate
/// (response, rating) cells; see the module docs for the index maps.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable {
    counts: Array2<f64>,
    n_levels: usize,
    n_ratings: usize,
    n_trials: usize,
}

/// Data-derived starting ranges for the grid search.
///
/// - `d_hat`: per-level sensitivity anchor from accuracy, 2·Φ⁻¹(acc),
///   monotonicized over levels and clamped to a plausible range.
/// - `chain`: ascending criteria chain of length 2L−1 from pooled cell
///   proportions mapped through Φ⁻¹; the element at index L−1 is the
///   decision-criterion anchor ĉ.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalAnchors {
    pub d_hat: Vec<f64>,
    pub chain: Vec<f64>,
}

impl EmpiricalAnchors {
    /// The decision-criterion anchor ĉ (center of the chain).
    pub fn c_hat(&self) -> f64 {
        self.chain[self.chain.len() / 2]
    }
}

impl CountTable {
    /// Aggregate one participant's trials into cell counts.
    ///
    /// Parameters
    /// ----------
    /// - `data`: the validated full dataset.
    /// - `participant`: id whose trials are aggregated.
    ///
    /// Returns
    /// -------
    /// The (2K × 2L) count table for that participant. Participants absent
    /// from `data` yield an all-zero table; the orchestrator only calls this
    /// with ids from `data.participants()`.
    pub fn from_trials(data: &TrialData, participant: u32) -> Self {
        let k = data.design.n_levels;
        let l = data.design.n_ratings;
        let mut counts = Array2::zeros((2 * k, 2 * l));
        let mut n_trials = 0usize;
        for i in 0..data.len() {
            if data.participant[i] != participant {
                continue;
            }
            let row = Self::condition_row_for(k, data.stimulus[i], data.level[i]);
            let col = Self::cell_col_for(l, data.response(i), data.rating[i]);
            counts[(row, col)] += 1.0;
            n_trials += 1;
        }
        CountTable { counts, n_levels: k, n_ratings: l, n_trials }
    }

    /// Raw cell counts, (2K × 2L).
    pub fn counts(&self) -> &Array2<f64> {
        &self.counts
    }

    /// Number of trials aggregated into the table.
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Number of difficulty levels K.
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Number of rating levels L.
    pub fn n_ratings(&self) -> usize {
        self.n_ratings
    }

    /// Row index of the (stimulus, difficulty) condition.
    pub fn condition_row(&self, stimulus: i8, level: usize) -> usize {
        Self::condition_row_for(self.n_levels, stimulus, level)
    }

    /// Column index of the (response, rating) cell.
    pub fn cell_col(&self, response: i8, rating: usize) -> usize {
        Self::cell_col_for(self.n_ratings, response, rating)
    }

    fn condition_row_for(k: usize, stimulus: i8, level: usize) -> usize {
        let stim_idx = usize::from(stimulus > 0);
        stim_idx * k + (level - 1)
    }

    fn cell_col_for(l: usize, response: i8, rating: usize) -> usize {
        let resp_idx = usize::from(response > 0);
        resp_idx * l + (rating - 1)
    }

    /// Derive the empirical grid anchors for this participant.
    ///
    /// Sensitivity: per level k, accuracy (with +0.5 correction) is mapped
    /// through `d = 2·Φ⁻¹(acc)`, clamped into [0.512, 0.998] accuracy units
    /// so the anchor stays positive and finite, then monotonicized across
    /// levels (cumulative max with a minimal gap) to respect the ordered-
    /// sensitivity constraint.
    ///
    /// Criteria: cells are pooled over conditions in evidence-ascending
    /// order — response −1 from rating L down to 1, then response +1 from
    /// rating 1 up to L — and the 2L−1 interior cumulative proportions are
    /// mapped through Φ⁻¹ into a strictly ascending chain.
    pub fn anchors(&self) -> EmpiricalAnchors {
        let normal = std_normal();
        let k = self.n_levels;
        let l = self.n_ratings;

        let mut d_hat = Vec::with_capacity(k);
        let mut prev = 0.0_f64;
        for level in 1..=k {
            let row_minus = self.condition_row(-1, level);
            let row_plus = self.condition_row(1, level);
            let mut n_level = 0.0;
            let mut n_correct = 0.0;
            for rating in 1..=l {
                let minus_col = self.cell_col(-1, rating);
                let plus_col = self.cell_col(1, rating);
                // correct cells: response matches the stimulus row
                n_correct += self.counts[(row_minus, minus_col)];
                n_correct += self.counts[(row_plus, plus_col)];
                n_level += self.counts[(row_minus, minus_col)]
                    + self.counts[(row_minus, plus_col)]
                    + self.counts[(row_plus, minus_col)]
                    + self.counts[(row_plus, plus_col)];
            }
            let acc = ((n_correct + 0.5) / (n_level + 1.0)).clamp(0.512, 0.998);
            let d = (2.0 * normal.inverse_cdf(acc)).max(prev + 1e-3);
            prev = d;
            d_hat.push(d);
        }

        let mut pooled = Vec::with_capacity(2 * l);
        for rating in (1..=l).rev() {
            pooled.push(self.column_total(self.cell_col(-1, rating)));
        }
        for rating in 1..=l {
            pooled.push(self.column_total(self.cell_col(1, rating)));
        }
        let total: f64 = pooled.iter().sum::<f64>() + 0.5 * (2 * l) as f64;
        let mut chain = Vec::with_capacity(2 * l - 1);
        let mut cum = 0.0;
        for cell in pooled.iter().take(2 * l - 1) {
            cum += cell + 0.5;
            chain.push(normal.inverse_cdf(cum / total));
        }
        EmpiricalAnchors { d_hat, chain }
    }

    fn column_total(&self, col: usize) -> f64 {
        self.counts.column(col).sum()
    }
}

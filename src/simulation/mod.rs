//! simulation — synthetic trial generation from the model catalog.
//!
//! Purpose
//! -------
//! Simulate trial-level data from any catalog model at a given natural
//! parameter set, primarily for parameter-recovery studies and the
//! end-to-end tests. Two sampling paths are used:
//!
//! - **Evidence-level** for SDT and the independent truncated-Gaussian
//!   models: the generative process is sampled literally — a normal
//!   evidence draw decides the response, and (for the ITG models) an
//!   inverse-CDF draw from the truncated confidence distribution produces
//!   the rating. This is the exact process those models describe.
//! - **Cell-level** for every other model: a multinomial draw over the
//!   model's predicted (response, rating) cells per condition, which is
//!   marginally equivalent to the generative process.
//!
//! Conventions
//! -----------
//! - `n_per_condition` trials are generated for every (stimulus,
//!   difficulty) condition, so the dataset is balanced by construction.
//! - Sampling is driven by a caller-supplied seed (`StdRng`), making every
//!   simulated dataset reproducible.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal as SampleNormal};
use statrs::distribution::ContinuousCDF;

use crate::confidence::{
    core::{Design, TrialData},
    errors::{ConfError, ConfResult},
    models::{
        layout::{self, CriteriaStyle, ExtraKind},
        prob::normal,
        ModelKind,
    },
};
use crate::optimization::simplex::Theta;

/// Simulate a balanced dataset from one catalog model.
///
/// # Arguments
/// - `kind`: catalog model to sample from.
/// - `natural`: natural-space parameters (validated by the model).
/// - `design`: experiment shape (K, L).
/// - `n_per_condition`: trials per (stimulus, difficulty) condition.
/// - `participant`: id stamped on every generated trial.
/// - `seed`: RNG seed for reproducibility.
///
/// # Errors
/// - Model-layer errors for parameters outside the model's domain, and
///   input-validation errors should the generated dataset be degenerate
///   (e.g. `n_per_condition` so small that no error trials occur).
pub fn simulate(
    kind: ModelKind, natural: &Theta, design: Design, n_per_condition: usize, participant: u32,
    seed: u64,
) -> ConfResult<TrialData> {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns = match kind {
        ModelKind::Sdt => evidence_sdt(natural, design, n_per_condition, &mut rng)?,
        ModelKind::Itgc => evidence_itg(natural, design, n_per_condition, false, &mut rng)?,
        ModelKind::Itgcm => evidence_itg(natural, design, n_per_condition, true, &mut rng)?,
        other => {
            let model = other.build(design).map_err(ConfError::from)?;
            let probs = model.predict(natural).map_err(ConfError::from)?;
            cell_multinomial(&probs, design, n_per_condition, &mut rng)
        }
    };
    let participants = vec![participant; columns.stimulus.len()];
    let level = if design.n_levels > 1 { Some(columns.level.as_slice()) } else { None };
    TrialData::new(&participants, &columns.stimulus, &columns.correct, &columns.rating, level)
}

struct Columns {
    stimulus: Vec<f64>,
    correct: Vec<u8>,
    rating: Vec<usize>,
    level: Vec<usize>,
}

impl Columns {
    fn with_capacity(n: usize) -> Self {
        Columns {
            stimulus: Vec::with_capacity(n),
            correct: Vec::with_capacity(n),
            rating: Vec::with_capacity(n),
            level: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, s: f64, response: f64, rating: usize, level: usize) {
        self.stimulus.push(s);
        self.correct.push(u8::from(response == s));
        self.rating.push(rating);
        self.level.push(level);
    }
}

/// Rating of an evidence value within an ordered criteria partition.
///
/// For the +1 side, confidence grows with evidence above the interior
/// criteria; for the −1 side it grows as evidence falls below them.
fn rating_from_partition(y: f64, interior: &[f64], upper: bool) -> usize {
    if upper {
        1 + interior.iter().filter(|&&b| y > b).count()
    } else {
        1 + interior.iter().filter(|&&b| y < b).count()
    }
}

/// Literal SDT generative process: one normal draw per trial.
fn evidence_sdt(
    natural: &Theta, design: Design, n_per_condition: usize, rng: &mut StdRng,
) -> ConfResult<Columns> {
    let k = design.n_levels;
    let l = design.n_ratings;
    let params = layout::validate(&natural.to_vec(), k, l, &[], CriteriaStyle::AroundC)
        .map_err(ConfError::from)?;
    let unit = SampleNormal::new(0.0, 1.0).expect("unit normal is always valid");
    let mut columns = Columns::with_capacity(2 * k * n_per_condition);
    for s in [-1.0f64, 1.0] {
        for level in 1..=k {
            let mu = s * params.d[level - 1] / 2.0;
            for _ in 0..n_per_condition {
                let x = mu + unit.sample(rng);
                let (response, rating) = if x > params.c {
                    (1.0, rating_from_partition(x, &params.tp, true))
                } else {
                    (-1.0, rating_from_partition(x, &params.tm, false))
                };
                columns.push(s, response, rating, level);
            }
        }
    }
    Ok(columns)
}

/// Literal independent truncated-Gaussian process: a normal draw decides
/// the response; the confidence draw comes from the meta distribution
/// truncated to the chosen side via inverse-CDF sampling.
fn evidence_itg(
    natural: &Theta, design: Design, n_per_condition: usize, scale_with_m: bool,
    rng: &mut StdRng,
) -> ConfResult<Columns> {
    let k = design.n_levels;
    let l = design.n_ratings;
    let params =
        layout::validate(&natural.to_vec(), k, l, &[ExtraKind::Positive], CriteriaStyle::AroundC)
            .map_err(ConfError::from)?;
    let m = params.extras[0];
    let (cut, tm, tp) = if scale_with_m {
        (
            m * params.c,
            params.tm.iter().map(|&v| m * v).collect::<Vec<_>>(),
            params.tp.iter().map(|&v| m * v).collect::<Vec<_>>(),
        )
    } else {
        (params.c, params.tm.clone(), params.tp.clone())
    };
    let unit = SampleNormal::new(0.0, 1.0).expect("unit normal is always valid");
    let mut columns = Columns::with_capacity(2 * k * n_per_condition);
    for s in [-1.0f64, 1.0] {
        for level in 1..=k {
            let mu = s * params.d[level - 1] / 2.0;
            let conf = normal(s * m * params.d[level - 1] / 2.0, 1.0)
                .map_err(ConfError::from)?;
            let cut_cdf = conf.cdf(cut);
            for _ in 0..n_per_condition {
                let x = mu + unit.sample(rng);
                let u: f64 = rng.gen();
                let (response, rating) = if x > params.c {
                    // y ~ conf truncated to (cut, ∞)
                    let y = conf.inverse_cdf(cut_cdf + u * (1.0 - cut_cdf));
                    (1.0, rating_from_partition(y, &tp, true))
                } else {
                    let y = conf.inverse_cdf(u * cut_cdf);
                    (-1.0, rating_from_partition(y, &tm, false))
                };
                columns.push(s, response, rating, level);
            }
        }
    }
    Ok(columns)
}

/// Cell-level sampling from predicted probabilities (any model).
fn cell_multinomial(
    probs: &Array2<f64>, design: Design, n_per_condition: usize, rng: &mut StdRng,
) -> Columns {
    let k = design.n_levels;
    let l = design.n_ratings;
    let mut columns = Columns::with_capacity(2 * k * n_per_condition);
    for (stim_idx, s) in [(0usize, -1.0f64), (1, 1.0)] {
        for level in 1..=k {
            let row = stim_idx * k + (level - 1);
            for _ in 0..n_per_condition {
                let mut u: f64 = rng.gen();
                let mut cell = 2 * l - 1;
                for col in 0..2 * l {
                    u -= probs[(row, col)];
                    if u <= 0.0 {
                        cell = col;
                        break;
                    }
                }
                let response = if cell < l { -1.0 } else { 1.0 };
                let rating = cell % l + 1;
                columns.push(s, response, rating, level);
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reproducibility under a fixed seed and balance of the design.
    // - Agreement of simulated frequencies with predicted probabilities at
    //   moderate sample sizes (cell path).
    //
    // They intentionally DO NOT cover:
    // - Full parameter recovery, exercised by the integration pipeline.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The same seed reproduces the same dataset; different seeds differ.
    //
    // Given
    // -----
    // - SDT with d = 1.5, c = 0, L = 4; 200 trials per condition.
    //
    // Expect
    // ------
    // - Seed 7 twice → identical columns; seed 8 → a different rating
    //   sequence.
    fn seeding_is_reproducible() {
        let design = Design { n_levels: 1, n_ratings: 4 };
        let natural = array![1.5, 0.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5];
        let a = simulate(ModelKind::Sdt, &natural, design, 200, 1, 7).expect("simulates");
        let b = simulate(ModelKind::Sdt, &natural, design, 200, 1, 7).expect("simulates");
        assert_eq!(a, b);
        let c = simulate(ModelKind::Sdt, &natural, design, 200, 1, 8).expect("simulates");
        assert_ne!(a.rating, c.rating);
    }

    #[test]
    // Purpose
    // -------
    // Cell-level simulation matches the model's predicted cell frequencies.
    //
    // Given
    // -----
    // - GN with σ = 1; 4000 trials per condition.
    //
    // Expect
    // ------
    // - Each observed cell frequency within 0.03 of its predicted
    //   probability.
    fn cell_frequencies_match_predictions() {
        let design = Design { n_levels: 1, n_ratings: 3 };
        let natural = array![1.2, 0.0, 1.0, -1.0, -0.4, 0.4, 1.0];
        let model = ModelKind::Gn.build(design).expect("valid design");
        let probs = model.predict(&natural).expect("valid params");
        let data =
            simulate(ModelKind::Gn, &natural, design, 4000, 1, 42).expect("simulates");
        let counts = crate::confidence::core::CountTable::from_trials(&data, 1);
        for row in 0..2 {
            let row_total: f64 = counts.counts().row(row).sum();
            for col in 0..6 {
                let freq = counts.counts()[(row, col)] / row_total;
                assert!(
                    (freq - probs[(row, col)]).abs() < 0.03,
                    "cell ({row},{col}): freq {freq} vs prob {}",
                    probs[(row, col)]
                );
            }
        }
    }
}

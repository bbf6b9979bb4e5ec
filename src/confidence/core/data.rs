//! Trial-level data containers for confidence-model fitting.
//!
//! Purpose
//! -------
//! Provide small, validated containers for trial-level behavioral data used
//! by the confidence-model catalog. This module centralizes input validation
//! for raw trial records and standardizes the stimulus/response coding so
//! downstream likelihood code can assume clean data.
//!
//! Key behaviors
//! -------------
//! - [`TrialData`] enforces the data invariants (equal column lengths,
//!   exactly two stimulus values, 0/1 correctness coding, in-range ratings
//!   and difficulty labels, at least one correct and one incorrect trial per
//!   participant, at least two distinct rating levels).
//! - Arbitrary two-valued stimulus codes are coerced onto the canonical
//!   −1/+1 coding, with an advisory warning when coercion changed anything.
//! - [`Design`] records the experiment shape (K difficulty levels, L rating
//!   levels) shared by every model built for a fit call.
//!
//! Invariants & assumptions
//! ------------------------
//! - After construction, `stimulus` contains only −1 and +1, `correct` only
//!   0 and 1, `rating` values lie in 1..=L, and `level` values in 1..=K.
//! - L is fixed for the whole fit call and equals the maximum observed
//!   rating; K equals the maximum observed difficulty label (1 when no
//!   difficulty column is supplied).
//! - Every participant present has at least one correct and one incorrect
//!   trial, guaranteeing finite closed-form type-1 statistics.
//!
//! Conventions
//! -----------
//! - The response side is derived, never stored: `response = stimulus` for
//!   correct trials and `−stimulus` otherwise.
//! - Advisory warnings (stimulus coercion, small samples) are collected on
//!   the container and surfaced by the orchestrator; they never block.
//!
//! Downstream usage
//! ----------------
//! - Construct [`TrialData`] at the API boundary where raw trial columns
//!   enter the fitting stack; both `fit_conf_models` and `fit_meta_dprime`
//!   take it as their input.
//! - The count aggregator consumes one participant's subset at a time and
//!   may rely on all invariants above.

use crate::confidence::errors::{ConfError, ConfResult, FitWarning};

/// Experiment shape shared by all models of one fit call.
///
/// - `n_levels`: number of difficulty levels K (≥ 1).
/// - `n_ratings`: number of rating levels L (≥ 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Design {
    pub n_levels: usize,
    pub n_ratings: usize,
}

/// `TrialData` — validated trial-level records plus the derived design.
///
/// Purpose
/// -------
/// Represent the complete, validated input of one fit call: one entry per
/// trial across all participants, with canonical codings and the derived
/// [`Design`]. Centralizes the fail-fast validation of §7 so that fitting
/// jobs can assume clean data.
///
/// Fields
/// ------
/// - `participant`: participant identifier per trial.
/// - `stimulus`: canonical stimulus coding, −1 or +1.
/// - `correct`: 1 for a correct response, 0 otherwise.
/// - `rating`: ordinal confidence rating in 1..=L.
/// - `level`: difficulty label in 1..=K (all 1 when K = 1).
/// - `design`: derived (K, L).
///
/// Invariants
/// ----------
/// - All columns share one length ≥ 1.
/// - Per participant: ≥ 1 correct and ≥ 1 incorrect trial.
/// - ≥ 2 distinct rating values across the whole input.
///
/// Notes
/// -----
/// - This type stores the union of all participants; per-participant count
///   tables are built downstream, once per participant, before the model
///   loop.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialData {
    pub participant: Vec<u32>,
    pub stimulus: Vec<i8>,
    pub correct: Vec<u8>,
    pub rating: Vec<usize>,
    pub level: Vec<usize>,
    pub design: Design,
    warnings: Vec<FitWarning>,
}

impl TrialData {
    /// Construct a validated [`TrialData`] from raw trial columns.
    ///
    /// Parameters
    /// ----------
    /// - `participant`: participant id per trial.
    /// - `stimulus`: raw stimulus codes; must carry exactly two distinct
    ///   values, which are mapped (smaller ↦ −1, larger ↦ +1).
    /// - `correct`: 0/1 correctness per trial.
    /// - `rating`: ordinal ratings; L is taken as the maximum value.
    /// - `level`: optional difficulty labels; `None` means a single level.
    ///
    /// Returns
    /// -------
    /// `ConfResult<TrialData>` — the validated container, or the first
    /// validation error encountered (fail fast, no partial batch).
    ///
    /// Errors
    /// ------
    /// - [`ConfError::EmptyData`], [`ConfError::LengthMismatch`],
    ///   [`ConfError::StimulusCardinality`], [`ConfError::InvalidCorrectCode`],
    ///   [`ConfError::RatingOutOfRange`], [`ConfError::LevelOutOfRange`],
    ///   [`ConfError::SingleRatingLevel`], [`ConfError::NoCorrectTrials`],
    ///   [`ConfError::NoIncorrectTrials`].
    pub fn new(
        participant: &[u32], stimulus: &[f64], correct: &[u8], rating: &[usize],
        level: Option<&[usize]>,
    ) -> ConfResult<Self> {
        let n = participant.len();
        if n == 0 {
            return Err(ConfError::EmptyData);
        }
        check_len("stimulus", n, stimulus.len())?;
        check_len("correct", n, correct.len())?;
        check_len("rating", n, rating.len())?;
        if let Some(level) = level {
            check_len("level", n, level.len())?;
        }

        let mut warnings = Vec::new();
        let stimulus = coerce_stimulus(stimulus, &mut warnings)?;

        for (index, &value) in correct.iter().enumerate() {
            if value > 1 {
                return Err(ConfError::InvalidCorrectCode { index, value });
            }
        }

        let mut distinct_ratings: Vec<usize> = Vec::new();
        let mut n_ratings = 0usize;
        for (index, &value) in rating.iter().enumerate() {
            if value == 0 {
                return Err(ConfError::RatingOutOfRange { index, value });
            }
            if !distinct_ratings.contains(&value) {
                distinct_ratings.push(value);
            }
            n_ratings = n_ratings.max(value);
        }
        if distinct_ratings.len() < 2 {
            return Err(ConfError::SingleRatingLevel);
        }

        let level: Vec<usize> = match level {
            Some(level) => {
                for (index, &value) in level.iter().enumerate() {
                    if value == 0 {
                        return Err(ConfError::LevelOutOfRange { index, value });
                    }
                }
                level.to_vec()
            }
            None => vec![1; n],
        };
        let n_levels = level.iter().copied().max().unwrap_or(1);

        let mut data = TrialData {
            participant: participant.to_vec(),
            stimulus,
            correct: correct.to_vec(),
            rating: rating.to_vec(),
            level,
            design: Design { n_levels, n_ratings },
            warnings,
        };
        data.check_participants()?;
        Ok(data)
    }

    /// Number of trials across all participants.
    pub fn len(&self) -> usize {
        self.participant.len()
    }

    /// True when the container holds no trials (cannot occur after `new`).
    pub fn is_empty(&self) -> bool {
        self.participant.is_empty()
    }

    /// Sorted, deduplicated participant ids — the deterministic enumeration
    /// order used for job construction and the final report.
    pub fn participants(&self) -> Vec<u32> {
        let mut ids = self.participant.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Derived response side of trial `i`: the stimulus for correct trials,
    /// its opposite otherwise.
    pub fn response(&self, i: usize) -> i8 {
        if self.correct[i] == 1 { self.stimulus[i] } else { -self.stimulus[i] }
    }

    /// Advisory warnings collected at construction (stimulus coercion,
    /// small per-participant samples).
    pub fn warnings(&self) -> &[FitWarning] {
        &self.warnings
    }

    /// Enforce the per-participant invariants and collect small-sample
    /// advisories.
    fn check_participants(&mut self) -> ConfResult<()> {
        for id in self.participants() {
            let mut n = 0usize;
            let mut n_correct = 0usize;
            for i in 0..self.len() {
                if self.participant[i] == id {
                    n += 1;
                    n_correct += usize::from(self.correct[i]);
                }
            }
            if n_correct == 0 {
                return Err(ConfError::NoCorrectTrials { participant: id });
            }
            if n_correct == n {
                return Err(ConfError::NoIncorrectTrials { participant: id });
            }
            if n < 400 {
                self.warnings.push(FitWarning::SmallSample { participant: id, n });
            }
        }
        Ok(())
    }
}

// ---- Helper Methods ----

fn check_len(field: &'static str, expected: usize, actual: usize) -> ConfResult<()> {
    if expected != actual {
        return Err(ConfError::LengthMismatch { field, expected, actual });
    }
    Ok(())
}

/// Map an arbitrary two-valued stimulus column onto −1/+1.
///
/// The numerically smaller value maps to −1. A warning is recorded whenever
/// the raw coding was anything other than exactly {−1, +1}.
fn coerce_stimulus(stimulus: &[f64], warnings: &mut Vec<FitWarning>) -> ConfResult<Vec<i8>> {
    let mut values: Vec<f64> = Vec::with_capacity(2);
    for (index, &s) in stimulus.iter().enumerate() {
        if !s.is_finite() {
            return Err(ConfError::NonFiniteStimulus { index, value: s });
        }
        if !values.iter().any(|&v| v == s) {
            values.push(s);
        }
        if values.len() > 2 {
            return Err(ConfError::StimulusCardinality { found: values.len() });
        }
    }
    if values.len() != 2 {
        return Err(ConfError::StimulusCardinality { found: values.len() });
    }
    values.sort_by(|a, b| a.partial_cmp(b).expect("stimulus codes compare"));
    let (low, high) = (values[0], values[1]);
    if !(low == -1.0 && high == 1.0) {
        warnings.push(FitWarning::StimulusCoerced { low, high });
    }
    Ok(stimulus.iter().map(|&s| if s == low { -1i8 } else { 1i8 }).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Happy-path construction and design derivation.
    // - Stimulus coercion with its advisory warning.
    // - Each fail-fast validation scenario from the error taxonomy.
    //
    // They intentionally DO NOT cover:
    // - Count aggregation, covered in core::counts.
    // -------------------------------------------------------------------------

    fn base_columns() -> (Vec<u32>, Vec<f64>, Vec<u8>, Vec<usize>) {
        // 8 trials, one participant, both stimuli, both outcomes, 3 ratings.
        let participant = vec![1; 8];
        let stimulus = vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
        let correct = vec![1, 1, 0, 0, 1, 1, 0, 1];
        let rating = vec![1, 2, 1, 3, 2, 3, 1, 2];
        (participant, stimulus, correct, rating)
    }

    #[test]
    // Purpose
    // -------
    // A well-formed input constructs with the expected design and no
    // stimulus-coercion warning.
    //
    // Given
    // -----
    // - Canonical −1/+1 stimuli, ratings up to 3, no difficulty column.
    //
    // Expect
    // ------
    // - K = 1, L = 3; the only warning is the small-sample advisory.
    fn happy_path_derives_design() {
        let (p, s, c, r) = base_columns();
        let data = TrialData::new(&p, &s, &c, &r, None).expect("valid input");
        assert_eq!(data.design, Design { n_levels: 1, n_ratings: 3 });
        assert_eq!(data.participants(), vec![1]);
        assert!(data
            .warnings()
            .iter()
            .all(|w| matches!(w, FitWarning::SmallSample { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Non-canonical two-valued stimulus codes are coerced to −1/+1 with an
    // advisory warning, smaller value mapping to −1.
    //
    // Given
    // -----
    // - Stimuli coded 0/90 (e.g., orientation in degrees).
    //
    // Expect
    // ------
    // - All stimuli become ±1 and a StimulusCoerced warning is recorded.
    fn stimulus_codes_are_coerced() {
        let (p, _, c, r) = base_columns();
        let s = vec![0.0, 90.0, 0.0, 90.0, 0.0, 90.0, 0.0, 90.0];
        let data = TrialData::new(&p, &s, &c, &r, None).expect("valid input");
        assert!(data.stimulus.iter().all(|&v| v == -1 || v == 1));
        assert_eq!(data.stimulus[0], -1);
        assert!(data
            .warnings()
            .iter()
            .any(|w| matches!(w, FitWarning::StimulusCoerced { low, high }
                if *low == 0.0 && *high == 90.0)));
    }

    #[test]
    // Purpose
    // -------
    // The fail-fast validation scenarios raise before any job could start.
    //
    // Given
    // -----
    // - A three-valued stimulus column, an all-correct participant, and a
    //   single-rating dataset.
    //
    // Expect
    // ------
    // - StimulusCardinality, NoIncorrectTrials, and SingleRatingLevel.
    fn fail_fast_scenarios() {
        let (p, s, c, r) = base_columns();

        let mut s3 = s.clone();
        s3[0] = 0.5;
        assert!(matches!(
            TrialData::new(&p, &s3, &c, &r, None),
            Err(ConfError::StimulusCardinality { found: 3 })
        ));

        let all_correct = vec![1u8; 8];
        assert!(matches!(
            TrialData::new(&p, &s, &all_correct, &r, None),
            Err(ConfError::NoIncorrectTrials { participant: 1 })
        ));

        let flat = vec![2usize; 8];
        assert!(matches!(
            TrialData::new(&p, &s, &c, &flat, None),
            Err(ConfError::SingleRatingLevel)
        ));
    }

    #[test]
    // Purpose
    // -------
    // The derived response equals the stimulus on correct trials and its
    // opposite on errors.
    //
    // Given
    // -----
    // - The base columns.
    //
    // Expect
    // ------
    // - response(0) == stimulus[0] (correct), response(2) == −stimulus[2]
    //   (incorrect).
    fn response_derivation() {
        let (p, s, c, r) = base_columns();
        let data = TrialData::new(&p, &s, &c, &r, None).expect("valid input");
        assert_eq!(data.response(0), data.stimulus[0]);
        assert_eq!(data.response(2), -data.stimulus[2]);
    }
}

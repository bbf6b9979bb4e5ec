//! Grid-candidate ranking for structured initialization.
//!
//! Models produce their own structured candidate sets (anchored on the data,
//! not a full Cartesian product); this module evaluates every candidate with
//! the objective, drops non-finite evaluations, and returns the best
//! `n_inits` distinct points in a stable order as initializers for the
//! multi-start driver.

use crate::optimization::{
    errors::{OptError, OptResult},
    simplex::{traits::NegLogLikelihood, types::Theta},
};

/// Evaluate grid candidates and return the top `n_inits` initializers.
///
/// # Behavior
/// - Evaluates `f.value` at every candidate; candidates whose objective is
///   non-finite (or whose evaluation errors) are discarded.
/// - Sorts the survivors ascending by objective with a stable sort, so ties
///   keep their grid enumeration order.
/// - Deduplicates bitwise-identical parameter vectors, keeping the first.
/// - Returns the first `n_inits` survivors (fewer if the grid is small).
///
/// # Errors
/// - [`OptError::EmptyGrid`] when `candidates` is empty.
/// - [`OptError::DegenerateGrid`] when no candidate evaluates to a finite
///   objective; callers must report this as a fitting failure, never mask it.
pub fn rank_initializers<F: NegLogLikelihood>(
    f: &F, data: &F::Data, candidates: &[Theta], n_inits: usize,
) -> OptResult<Vec<Theta>> {
    if candidates.is_empty() {
        return Err(OptError::EmptyGrid);
    }
    let mut scored: Vec<(usize, f64)> = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        if candidate.iter().any(|v| !v.is_finite()) {
            continue;
        }
        match f.value(candidate, data) {
            Ok(value) if value.is_finite() => scored.push((idx, value)),
            _ => {}
        }
    }
    if scored.is_empty() {
        return Err(OptError::DegenerateGrid { evaluated: candidates.len() });
    }
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("finite values always compare"));

    let mut inits: Vec<Theta> = Vec::with_capacity(n_inits);
    for (idx, _) in scored {
        let candidate = &candidates[idx];
        let duplicate = inits.iter().any(|kept| {
            kept.len() == candidate.len()
                && kept.iter().zip(candidate.iter()).all(|(a, b)| a.to_bits() == b.to_bits())
        });
        if duplicate {
            continue;
        }
        inits.push(candidate.clone());
        if inits.len() == n_inits {
            break;
        }
    }
    Ok(inits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Ascending ranking with stable tie order.
    // - Non-finite candidates being skipped, and the all-non-finite failure.
    // - Deduplication of identical candidates.
    //
    // They intentionally DO NOT cover:
    // - Model-specific grid construction, tested per model.
    // -------------------------------------------------------------------------

    struct Abs;

    impl NegLogLikelihood for Abs {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(theta[0].abs())
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    struct NanAtOrigin;

    impl NegLogLikelihood for NanAtOrigin {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            if theta[0] == 0.0 { Ok(f64::NAN) } else { Ok(theta[0].abs()) }
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Candidates come back sorted ascending by objective value, capped at
    // n_inits, with duplicates removed.
    //
    // Given
    // -----
    // - Candidates [3], [1], [1], [-2], [5] under |x|, n_inits = 3.
    //
    // Expect
    // ------
    // - Initializers [1], [-2], [3]; the duplicate [1] is dropped.
    fn ranking_sorts_dedups_and_caps() {
        let candidates =
            vec![array![3.0], array![1.0], array![1.0], array![-2.0], array![5.0]];
        let inits = rank_initializers(&Abs, &(), &candidates, 3).expect("grid should rank");
        assert_eq!(inits.len(), 3);
        assert_eq!(inits[0][0], 1.0);
        assert_eq!(inits[1][0], -2.0);
        assert_eq!(inits[2][0], 3.0);
    }

    #[test]
    // Purpose
    // -------
    // A candidate with a non-finite objective is skipped; if every candidate
    // is non-finite the grid is reported as degenerate.
    //
    // Given
    // -----
    // - NanAtOrigin objective with candidates [0] (NaN) and [2] (finite),
    //   then with the single candidate [0].
    //
    // Expect
    // ------
    // - First call returns only [2]; second call errs with DegenerateGrid.
    fn non_finite_candidates_are_skipped_or_fail() {
        let candidates = vec![array![0.0], array![2.0]];
        let inits =
            rank_initializers(&NanAtOrigin, &(), &candidates, 5).expect("one finite candidate");
        assert_eq!(inits.len(), 1);
        assert_eq!(inits[0][0], 2.0);

        let only_nan = vec![array![0.0]];
        assert!(matches!(
            rank_initializers(&NanAtOrigin, &(), &only_nan, 5),
            Err(OptError::DegenerateGrid { evaluated: 1 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // An empty candidate set is a distinct error from a degenerate one.
    //
    // Given
    // -----
    // - No candidates.
    //
    // Expect
    // ------
    // - OptError::EmptyGrid.
    fn empty_grid_is_reported() {
        assert!(matches!(rank_initializers(&Abs, &(), &[], 3), Err(OptError::EmptyGrid)));
    }
}

//! Cell-probability assembly helpers shared by the model catalog.
//!
//! Every model expresses its (response, rating) cell probabilities as
//! differences of cumulative distribution values; the helpers here cover the
//! three recurring shapes:
//! - a truncated partition of one response side with the side mass as the
//!   normalizer ([`side_rating_probs`]) — SDT degenerates to this with the
//!   type-1 distribution itself,
//! - an independent full-line partition per response side
//!   ([`full_line_rating_probs`]),
//! - a partition of the positive half-line by distance criteria for the
//!   lognormal models ([`distance_rating_probs`]).
//!
//! All helpers return the L conditional rating probabilities in rating order
//! 1..L; side reversal (low evidence = high confidence on the −1 side) is
//! handled internally.

use statrs::distribution::{ContinuousCDF, LogNormal, Normal};

use crate::confidence::errors::{ModelError, ModelResult};
use crate::optimization::numerical_stability::transformations::GAP_FLOOR;

pub(crate) use crate::confidence::core::counts::std_normal;

/// Construct a normal distribution, mapping an invalid standard deviation to
/// a model error instead of panicking.
pub(crate) fn normal(mean: f64, sd: f64) -> ModelResult<Normal> {
    Normal::new(mean, sd)
        .map_err(|_| ModelError::NonPositiveScale { name: "sd", value: sd })
}

/// Construct a lognormal distribution over the positive half-line.
pub(crate) fn log_normal(location: f64, scale: f64) -> ModelResult<LogNormal> {
    LogNormal::new(location, scale)
        .map_err(|_| ModelError::NonPositiveScale { name: "sigma", value: scale })
}

/// Probability that the type-1 evidence lands on the −1 side of `c`.
pub(crate) fn side_minus_prob(type1: &Normal, c: f64) -> f64 {
    type1.cdf(c)
}

/// Conditional rating probabilities on one response side of a cut point.
///
/// `interior` holds the L−1 ascending in-side criteria (above `cut` for the
/// +1 side, below it for the −1 side). The side mass `F(hi) − F(lo)` is the
/// normalizer; a numerically empty side falls back to the uniform rating
/// distribution so the result is always a proper distribution.
///
/// Returns the L probabilities in rating order 1..L.
pub(crate) fn side_rating_probs(
    dist: &Normal, interior: &[f64], cut: f64, upper: bool,
) -> Vec<f64> {
    let l = interior.len() + 1;
    let mut cdfs = Vec::with_capacity(l + 1);
    if upper {
        cdfs.push(dist.cdf(cut));
        for &b in interior {
            cdfs.push(dist.cdf(b));
        }
        cdfs.push(1.0);
    } else {
        cdfs.push(0.0);
        for &b in interior {
            cdfs.push(dist.cdf(b));
        }
        cdfs.push(dist.cdf(cut));
    }
    normalized_diffs(&cdfs, l, !upper)
}

/// Rating probabilities from an independent partition of the whole line.
///
/// `interior` holds the L−1 ascending criteria of one response side; the
/// partition covers (−∞, ∞), so no truncation mass is involved.
///
/// Returns the L probabilities in rating order 1..L.
pub(crate) fn full_line_rating_probs(dist: &Normal, interior: &[f64], upper: bool) -> Vec<f64> {
    let l = interior.len() + 1;
    let mut cdfs = Vec::with_capacity(l + 1);
    cdfs.push(0.0);
    for &b in interior {
        cdfs.push(dist.cdf(b));
    }
    cdfs.push(1.0);
    normalized_diffs(&cdfs, l, !upper)
}

/// Rating probabilities from positive distance criteria under a lognormal
/// confidence-evidence distribution.
///
/// `interior` holds the L−1 ascending positive criteria; bins partition
/// (0, ∞) and confidence ascends with distance on both response sides, so no
/// reversal applies.
pub(crate) fn distance_rating_probs(dist: &LogNormal, interior: &[f64]) -> Vec<f64> {
    let l = interior.len() + 1;
    let mut cdfs = Vec::with_capacity(l + 1);
    cdfs.push(0.0);
    for &b in interior {
        cdfs.push(dist.cdf(b));
    }
    cdfs.push(1.0);
    normalized_diffs(&cdfs, l, false)
}

/// Successive CDF differences normalized by the total mass, with the uniform
/// fallback for numerically empty masses and optional reversal for the −1
/// side (where ascending evidence means descending confidence).
fn normalized_diffs(cdfs: &[f64], l: usize, reverse: bool) -> Vec<f64> {
    let mass = cdfs[l] - cdfs[0];
    let mut probs = Vec::with_capacity(l);
    for i in 0..l {
        let diff = (cdfs[i + 1] - cdfs[i]).max(0.0);
        probs.push(if mass > GAP_FLOOR { diff / mass } else { 1.0 / l as f64 });
    }
    if reverse {
        probs.reverse();
    }
    probs
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Proper normalization of every helper's output.
    // - Side reversal on the −1 response side.
    // - The uniform fallback when a side carries no mass.
    //
    // They intentionally DO NOT cover:
    // - Full model predictions, covered per model.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Conditional rating probabilities sum to one on both sides and reverse
    // correctly on the −1 side.
    //
    // Given
    // -----
    // - A unit normal, cut at 0, interior criteria at ±0.5 and ±1.5.
    //
    // Expect
    // ------
    // - Each side sums to 1; on the −1 side the most extreme interval (most
    //   negative evidence) carries the highest rating.
    fn side_probs_normalize_and_reverse() {
        let dist = std_normal();
        let upper = side_rating_probs(&dist, &[0.5, 1.5], 0.0, true);
        assert!((upper.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        let lower = side_rating_probs(&dist, &[-1.5, -0.5], 0.0, false);
        assert!((lower.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        // Rating 3 on the lower side is P(x < −1.5)/P(x < 0).
        let expected = dist.cdf(-1.5) / dist.cdf(0.0);
        assert!((lower[2] - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A side with numerically zero mass falls back to the uniform rating
    // distribution rather than emitting NaNs.
    //
    // Given
    // -----
    // - A normal centered at +40 evaluated on the −1 side of cut 0.
    //
    // Expect
    // ------
    // - All L probabilities equal 1/L.
    fn empty_side_is_uniform() {
        let dist = normal(40.0, 1.0).expect("valid sd");
        let lower = side_rating_probs(&dist, &[-1.0], 0.0, false);
        assert_eq!(lower, vec![0.5, 0.5]);
    }

    #[test]
    // Purpose
    // -------
    // Full-line and distance partitions are proper distributions.
    //
    // Given
    // -----
    // - A shifted normal with two interior criteria; a lognormal with two
    //   positive criteria.
    //
    // Expect
    // ------
    // - Both outputs sum to 1 and are elementwise non-negative.
    fn independent_partitions_normalize() {
        let dist = normal(0.7, 1.0).expect("valid sd");
        let probs = full_line_rating_probs(&dist, &[-0.2, 0.9], true);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs.iter().all(|&p| p >= 0.0));

        let dist = log_normal(0.0, 0.8).expect("valid scale");
        let probs = distance_rating_probs(&dist, &[0.4, 1.2]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}

//! Shared parameter layouts and natural ↔ unconstrained transforms.
//!
//! Every catalog model stores its natural parameters in one flat vector
//! with the layout
//!
//! ```text
//! [ d_1 … d_K | c | extras… | θ⁻ ascending (L−1) | θ⁺ ascending (L−1) ]
//! ```
//!
//! where the criteria blocks are interpreted according to a
//! [`CriteriaStyle`]:
//! - `AroundC`: one ordered chain θ⁻ < c < θ⁺ (SDT family and the truncated
//!   models); unconstrained coordinates are log-gaps outward from c.
//! - `Free`: two independent ordered chains unrelated to c (independent
//!   Gaussian model); first element free, then log-gaps.
//! - `PositiveDistance`: two positive ordered chains on (0, ∞) (lognormal
//!   models); log of the first element, then log-gaps.
//!
//! Sensitivities are always an ordered positive chain (log of d₁, then
//! log-increments), `c` is unrestricted, and extras are transformed per
//! [`ExtraKind`] (log for positive scales, logit for unit-interval weights).
//! The forward and inverse maps here are mutual inverses over the natural
//! domain; `validate` is the single source of truth for that domain and is
//! shared by `transform` and `predict`.

use crate::confidence::errors::{ModelError, ModelResult};
use crate::optimization::numerical_stability::transformations::{
    chain_to_gaps, gaps_to_chain, gaps_to_pos_chain, pos_chain_to_gaps, safe_exp, safe_ln,
    safe_logistic, safe_logit,
};

/// Domain of one extra (model-specific) scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraKind {
    /// Strictly positive scale (σ, b, m): ln ↔ exp.
    Positive,
    /// Weight in (0, 1): logit ↔ logistic.
    UnitInterval,
}

/// Interpretation of the two criteria blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaStyle {
    AroundC,
    Free,
    PositiveDistance,
}

/// Parsed view of one natural parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainParams {
    pub d: Vec<f64>,
    pub c: f64,
    pub extras: Vec<f64>,
    /// θ⁻ block, ascending.
    pub tm: Vec<f64>,
    /// θ⁺ block, ascending.
    pub tp: Vec<f64>,
}

/// Total parameter count for a layout with `n_extras` extra scalars.
pub fn layout_len(k: usize, l: usize, n_extras: usize) -> usize {
    k + 1 + n_extras + 2 * (l - 1)
}

/// Column names in vector order, matching the layout exactly.
///
/// θ⁻ entries are named by rating boundary, most extreme first
/// (`theta_minus.3, theta_minus.2, theta_minus.1` for L = 4), mirroring the
/// ascending storage; θ⁺ entries count up.
pub fn layout_names(k: usize, l: usize, extras: &[&str]) -> Vec<String> {
    let mut names = Vec::with_capacity(layout_len(k, l, extras.len()));
    for i in 1..=k {
        names.push(format!("d_{i}"));
    }
    names.push("c".to_string());
    for extra in extras {
        names.push((*extra).to_string());
    }
    for j in (1..l).rev() {
        names.push(format!("theta_minus.{j}"));
    }
    for j in 1..l {
        names.push(format!("theta_plus.{j}"));
    }
    names
}

/// Split a natural vector into its blocks, checking only the length.
pub fn split_natural(
    natural: &[f64], k: usize, l: usize, n_extras: usize,
) -> ModelResult<ChainParams> {
    let expected = layout_len(k, l, n_extras);
    if natural.len() != expected {
        return Err(ModelError::ThetaLengthMismatch { expected, actual: natural.len() });
    }
    let m = l - 1;
    let d = natural[..k].to_vec();
    let c = natural[k];
    let extras = natural[k + 1..k + 1 + n_extras].to_vec();
    let tm = natural[k + 1 + n_extras..k + 1 + n_extras + m].to_vec();
    let tp = natural[k + 1 + n_extras + m..].to_vec();
    Ok(ChainParams { d, c, extras, tm, tp })
}

/// Validate a natural vector against the layout's domain.
///
/// Checks, in order: finiteness of every entry, positive ordered
/// sensitivities, extras domains, and the criteria ordering demanded by
/// `style`. Shared by `transform` and `predict` so both agree on the domain.
pub fn validate(
    natural: &[f64], k: usize, l: usize, extras: &[ExtraKind], style: CriteriaStyle,
) -> ModelResult<ChainParams> {
    let params = split_natural(natural, k, l, extras.len())?;
    for (index, &value) in natural.iter().enumerate() {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteParam { index, value });
        }
    }
    for (index, &value) in params.d.iter().enumerate() {
        if value <= 0.0 {
            return Err(ModelError::NonPositiveSensitivity { index, value });
        }
        if index > 0 && value < params.d[index - 1] {
            return Err(ModelError::UnorderedSensitivity { index });
        }
    }
    for (&kind, &value) in extras.iter().zip(params.extras.iter()) {
        match kind {
            ExtraKind::Positive => {
                if value <= 0.0 {
                    return Err(ModelError::NonPositiveScale { name: "scale", value });
                }
            }
            ExtraKind::UnitInterval => {
                if value <= 0.0 || value >= 1.0 {
                    return Err(ModelError::WeightOutOfRange { value });
                }
            }
        }
    }
    validate_criteria(&params, style)?;
    Ok(params)
}

/// Criteria may tie (a tied pair just zeroes out its rating cell, which the
/// likelihood floor absorbs) but must never invert or cross c; this keeps
/// collapsed chains — which the optimizer legitimately visits when a rating
/// category is unused — inside the domain.
fn validate_criteria(params: &ChainParams, style: CriteriaStyle) -> ModelResult<()> {
    let check_ordered = |chain: &[f64], offset: usize| -> ModelResult<()> {
        for i in 1..chain.len() {
            if chain[i] < chain[i - 1] {
                return Err(ModelError::UnorderedCriteria { index: offset + i });
            }
        }
        Ok(())
    };
    check_ordered(&params.tm, 0)?;
    check_ordered(&params.tp, params.tm.len())?;
    match style {
        CriteriaStyle::AroundC => {
            if let Some(&last) = params.tm.last() {
                if last > params.c {
                    return Err(ModelError::UnorderedCriteria { index: params.tm.len() - 1 });
                }
            }
            if let Some(&first) = params.tp.first() {
                if first < params.c {
                    return Err(ModelError::UnorderedCriteria { index: params.tm.len() });
                }
            }
        }
        CriteriaStyle::Free => {}
        CriteriaStyle::PositiveDistance => {
            if params.tm.first().is_some_and(|&v| v < 0.0) {
                return Err(ModelError::UnorderedCriteria { index: 0 });
            }
            if params.tp.first().is_some_and(|&v| v < 0.0) {
                return Err(ModelError::UnorderedCriteria { index: params.tm.len() });
            }
        }
    }
    Ok(())
}

/// Natural → unconstrained map for the shared layout.
pub fn transform_natural(
    natural: &[f64], k: usize, l: usize, extras: &[ExtraKind], style: CriteriaStyle,
) -> ModelResult<Vec<f64>> {
    let params = validate(natural, k, l, extras, style)?;
    let mut theta = Vec::with_capacity(natural.len());
    theta.extend(pos_chain_to_gaps(&params.d));
    theta.push(params.c);
    for (&kind, &value) in extras.iter().zip(params.extras.iter()) {
        theta.push(match kind {
            ExtraKind::Positive => safe_ln(value),
            ExtraKind::UnitInterval => safe_logit(value),
        });
    }
    match style {
        CriteriaStyle::AroundC => {
            // Log-gaps outward from c: θ⁻ is walked from its c-adjacent end.
            let mut prev = params.c;
            let mut tm_gaps = Vec::with_capacity(params.tm.len());
            for &v in params.tm.iter().rev() {
                tm_gaps.push(safe_ln(prev - v));
                prev = v;
            }
            theta.extend(tm_gaps);
            let mut prev = params.c;
            for &v in params.tp.iter() {
                theta.push(safe_ln(v - prev));
                prev = v;
            }
        }
        CriteriaStyle::Free => {
            theta.extend(chain_to_gaps(&params.tm));
            theta.extend(chain_to_gaps(&params.tp));
        }
        CriteriaStyle::PositiveDistance => {
            theta.extend(pos_chain_to_gaps(&params.tm));
            theta.extend(pos_chain_to_gaps(&params.tp));
        }
    }
    Ok(theta)
}

/// Unconstrained → natural map for the shared layout.
///
/// Total inverse of [`transform_natural`]: any finite θ maps into the
/// natural domain, so this only checks the vector length.
pub fn untransform_natural(
    theta: &[f64], k: usize, l: usize, extras: &[ExtraKind], style: CriteriaStyle,
) -> ModelResult<Vec<f64>> {
    let expected = layout_len(k, l, extras.len());
    if theta.len() != expected {
        return Err(ModelError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    let m = l - 1;
    let mut natural = Vec::with_capacity(expected);
    natural.extend(gaps_to_pos_chain(&theta[..k]));
    let c = theta[k];
    natural.push(c);
    for (&kind, &value) in extras.iter().zip(theta[k + 1..k + 1 + extras.len()].iter()) {
        natural.push(match kind {
            ExtraKind::Positive => safe_exp(value),
            ExtraKind::UnitInterval => safe_logistic(value),
        });
    }
    let tm_theta = &theta[k + 1 + extras.len()..k + 1 + extras.len() + m];
    let tp_theta = &theta[k + 1 + extras.len() + m..];
    match style {
        CriteriaStyle::AroundC => {
            // Walk outward from c, then store ascending.
            let mut tm = Vec::with_capacity(m);
            let mut prev = c;
            for &g in tm_theta {
                prev -= safe_exp(g);
                tm.push(prev);
            }
            tm.reverse();
            natural.extend(tm);
            let mut prev = c;
            for &g in tp_theta {
                prev += safe_exp(g);
                natural.push(prev);
            }
        }
        CriteriaStyle::Free => {
            natural.extend(gaps_to_chain(tm_theta));
            natural.extend(gaps_to_chain(tp_theta));
        }
        CriteriaStyle::PositiveDistance => {
            natural.extend(gaps_to_pos_chain(tm_theta));
            natural.extend(gaps_to_pos_chain(tp_theta));
        }
    }
    Ok(natural)
}

//! models — the confidence-model registry.
//!
//! Purpose
//! -------
//! Provide, per model name, the parameter layout, the natural ↔
//! unconstrained transforms, the cell-probability function, and the
//! structured grid candidates — everything the fitting pipeline needs,
//! behind one polymorphic [`ConfidenceModel`] trait selected by a
//! [`ModelKind`] tagged variant.
//!
//! Key behaviors
//! -------------
//! - Nine catalog models: SDT, GN, WEV, PDA, IG, ITGc, ITGcm, logN, logWEV,
//!   each a small struct parameterized only by the experiment [`Design`].
//! - `transform`/`untransform` are mutual inverses over the natural domain
//!   (see [`layout`]); `predict` is a standalone pure function usable by
//!   external visualization, independent of the fitting pipeline.
//! - [`neg_log_likelihood`] floors every cell probability at `PROB_FLOOR`
//!   before the logarithm, keeping the objective finite, and depends only on
//!   the count table — never on trial order.
//!
//! Conventions
//! -----------
//! - `predict` returns an `Array2<f64>` with the count-table layout: one row
//!   per (stimulus, difficulty) condition, one column per (response, rating)
//!   cell; each row sums to 1.
//! - Shared generative frame: type-1 evidence x ~ N(s·d_k/2, 1), choice
//!   R = +1 iff x > c; model families differ in the confidence variable
//!   judged against their criteria (see the per-model module docs).

pub mod gn;
pub mod ig;
pub mod itg;
pub mod layout;
pub mod lognorm;
pub mod pda;
pub mod prob;
pub mod sdt;
pub mod wev;

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::confidence::{
    core::{CountTable, Design, EmpiricalAnchors},
    errors::{ConfError, ModelError, ModelResult},
};
use crate::optimization::{
    numerical_stability::transformations::PROB_FLOOR, simplex::Theta,
};

/// Polymorphic interface of one catalog model.
///
/// Implementations are stateless apart from the experiment [`Design`]; all
/// methods are pure, so a model value can be shared freely across jobs and
/// threads.
pub trait ConfidenceModel: Send + Sync {
    /// The tagged variant selecting this model.
    fn kind(&self) -> ModelKind;

    /// Experiment shape this instance was built for.
    fn design(&self) -> Design;

    /// Number of free parameters k as a function of (K, L).
    fn n_params(&self) -> usize;

    /// Natural-parameter names in vector order.
    fn param_names(&self) -> Vec<String>;

    /// Natural → unconstrained map. Errors when `natural` lies outside the
    /// model's domain (ordering, positivity, weights).
    fn transform(&self, natural: &Theta) -> ModelResult<Theta>;

    /// Unconstrained → natural map; total over finite vectors, so it only
    /// checks the length.
    fn untransform(&self, theta: &Theta) -> ModelResult<Theta>;

    /// Cell probabilities per condition in the count-table layout.
    ///
    /// Standalone pure prediction used both by the likelihood and by
    /// downstream visualization of model-implied distributions.
    fn predict(&self, natural: &Theta) -> ModelResult<Array2<f64>>;

    /// Structured grid candidates in unconstrained space, anchored on the
    /// participant's empirical summary.
    fn grid_candidates(&self, anchors: &EmpiricalAnchors) -> Vec<Theta>;

    /// Negative log-likelihood of `natural` given aggregated counts.
    fn neg_loglik(&self, natural: &Theta, counts: &CountTable) -> ModelResult<f64> {
        let probs = self.predict(natural)?;
        Ok(neg_log_likelihood(&probs, counts))
    }
}

/// Tagged variant naming each catalog model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Sdt,
    Gn,
    Wev,
    Pda,
    Ig,
    Itgc,
    Itgcm,
    LogN,
    LogWev,
}

impl ModelKind {
    /// The full catalog in its canonical report order.
    pub fn all() -> [ModelKind; 9] {
        [
            ModelKind::Sdt,
            ModelKind::Gn,
            ModelKind::Wev,
            ModelKind::Pda,
            ModelKind::Ig,
            ModelKind::Itgc,
            ModelKind::Itgcm,
            ModelKind::LogN,
            ModelKind::LogWev,
        ]
    }

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Sdt => "SDT",
            ModelKind::Gn => "GN",
            ModelKind::Wev => "WEV",
            ModelKind::Pda => "PDA",
            ModelKind::Ig => "IG",
            ModelKind::Itgc => "ITGc",
            ModelKind::Itgcm => "ITGcm",
            ModelKind::LogN => "logN",
            ModelKind::LogWev => "logWEV",
        }
    }

    /// Build the model instance for an experiment design.
    ///
    /// # Errors
    /// - [`ModelError::InvalidRatingCount`] when L < 2; with a single rating
    ///   level no confidence criterion is identifiable.
    pub fn build(&self, design: Design) -> ModelResult<Box<dyn ConfidenceModel>> {
        if design.n_ratings < 2 {
            return Err(ModelError::InvalidRatingCount { n_ratings: design.n_ratings });
        }
        Ok(match self {
            ModelKind::Sdt => Box::new(sdt::Sdt::new(design)),
            ModelKind::Gn => Box::new(gn::GaussianNoise::new(design)),
            ModelKind::Wev => Box::new(wev::Wev::new(design)),
            ModelKind::Pda => Box::new(pda::Pda::new(design)),
            ModelKind::Ig => Box::new(ig::IndependentGaussian::new(design)),
            ModelKind::Itgc => Box::new(itg::IndependentTruncGaussian::new(design, false)),
            ModelKind::Itgcm => Box::new(itg::IndependentTruncGaussian::new(design, true)),
            ModelKind::LogN => Box::new(lognorm::LogNorm::new(design, false)),
            ModelKind::LogWev => Box::new(lognorm::LogNorm::new(design, true)),
        })
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ConfError;

    /// Parse a model name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfError::UnknownModel { name: s.to_string() })
    }
}

/// Negative log-likelihood of predicted cell probabilities under observed
/// counts.
///
/// Each probability is floored at [`PROB_FLOOR`] before the logarithm;
/// cells with zero observed count contribute nothing, so the sum stays
/// finite for any proper probability table.
pub fn neg_log_likelihood(probs: &Array2<f64>, counts: &CountTable) -> f64 {
    let mut nll = 0.0;
    for (&count, &p) in counts.counts().iter().zip(probs.iter()) {
        if count > 0.0 {
            nll -= count * p.max(PROB_FLOOR).ln();
        }
    }
    nll
}

// ---- Grid-candidate helpers shared by the catalog --------------------------

/// Sensitivity anchor scaled by a grid factor (order-preserving).
pub(crate) fn scaled_d(anchors: &EmpiricalAnchors, scale: f64) -> Vec<f64> {
    anchors.d_hat.iter().map(|&d| d * scale).collect()
}

/// Criteria-chain anchor with gaps from ĉ scaled by a grid factor.
///
/// Returns `(c, θ⁻ ascending, θ⁺ ascending)`; scaling about ĉ preserves the
/// chain ordering for any positive factor.
pub(crate) fn scaled_criteria(
    anchors: &EmpiricalAnchors, scale: f64,
) -> (f64, Vec<f64>, Vec<f64>) {
    let chain = &anchors.chain;
    let l_minus_1 = chain.len() / 2;
    let c = chain[l_minus_1];
    let tm = chain[..l_minus_1].iter().map(|&v| c + (v - c) * scale).collect();
    let tp = chain[l_minus_1 + 1..].iter().map(|&v| c + (v - c) * scale).collect();
    (c, tm, tp)
}

/// Ascending positive distance chains |θ − c| per response side, for the
/// lognormal criteria.
pub(crate) fn distance_chains(c: f64, tm: &[f64], tp: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let qm = tm.iter().rev().map(|&v| c - v).collect();
    let qp = tp.iter().map(|&v| v - c).collect();
    (qm, qp)
}

pub mod prelude {
    pub use super::{neg_log_likelihood, ConfidenceModel, ModelKind};
}

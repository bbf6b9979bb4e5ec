//! Shared numerical-stability primitives for parameter transforms.

pub mod transformations;

pub mod prelude {
    pub use super::transformations::{
        chain_to_gaps, gaps_to_chain, gaps_to_pos_chain, pos_chain_to_gaps, safe_exp, safe_ln,
        safe_logistic, safe_logit, GAP_FLOOR, PENALTY, PROB_FLOOR,
    };
}

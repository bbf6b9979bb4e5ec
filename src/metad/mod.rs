//! metad — the reduced meta-d′/d′ estimation procedure.
//!
//! Stage 1 ([`type1`]) computes type-1 sensitivity and bias in closed form;
//! stage 2 ([`fit`]) holds them fixed and estimates metacognitive
//! efficiency with the shared grid + multi-restart simplex machinery.

pub mod fit;
pub mod type1;

pub use fit::{fit_meta_dprime, MetaDOutcome, MetaDVariant};
pub use type1::Type1Outcome;

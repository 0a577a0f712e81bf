//! Decision engine over classification scores.

use obscura_vision::{Likelihood, SafeSearchAnnotation};

/// Likelihood treated as a definite positive. The threshold is deliberately
/// the top of the scale: "likely" content is not remediated.
const DEFINITE_POSITIVE: Likelihood = Likelihood::VeryLikely;

/// What to do with a classified object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Remediate,
    Accept,
}

/// Remediate iff the adult or violence category is at the definite-positive
/// level; every other combination is accepted.
pub fn decide(annotation: &SafeSearchAnnotation) -> Verdict {
    if annotation.adult == DEFINITE_POSITIVE || annotation.violence == DEFINITE_POSITIVE {
        Verdict::Remediate
    } else {
        Verdict::Accept
    }
}

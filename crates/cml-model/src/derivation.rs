//! Derivation scores: how specifically one type instantiates a generic one.
//!
//! Both types are expected to be normalized; names are compared verbatim.

use crate::types::Type;

/// Score reported when no derivation relationship exists.
pub const INCOMPATIBLE: i32 = -1;

/// Count the parameter holes of `generic` that `derived` fills with model
/// structure, or `None` if `derived` is not a specialization of `generic`.
pub fn derivation(derived: &Type, generic: &Type) -> Option<u32> {
    match (generic, derived) {
        (Type::Parameter(_), Type::Parameter(_)) => Some(0),
        (Type::Parameter(_), Type::Model(_)) => Some(1),
        (Type::Model(_), Type::Parameter(_)) => None,
        (Type::Model(generic), Type::Model(derived)) => {
            if generic.model_name != derived.model_name
                || generic.type_arguments.len() != derived.type_arguments.len()
            {
                return None;
            }

            derived
                .type_arguments
                .iter()
                .zip(&generic.type_arguments)
                .map(|(derived, generic)| derivation(derived, generic))
                .sum()
        }
    }
}

/// The derivation score of `derived` against `generic`: `0` for an exact
/// match, larger for more specialized matches, [`INCOMPATIBLE`] otherwise.
pub fn compute_derivation_score(derived: &Type, generic: &Type) -> i32 {
    derivation(derived, generic)
        .and_then(|score| i32::try_from(score).ok())
        .unwrap_or(INCOMPATIBLE)
}

/// Whether `limited` is an equally or more specific, compatible form of `generic`.
pub fn is_derivation(limited: &Type, generic: &Type) -> bool {
    derivation(limited, generic).is_some()
}

//! Overload selection.
//!
//! A function name resolves to an overload set; this module picks the winner
//! at a call site from the argument types. Exact matches beat converted
//! matches because a conversion step makes a parameter vector strictly
//! greater under the component-wise `<:` order.

use crate::program::{FunctionId, Program, TypeId};

/// The result of overload selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverloadOutcome {
    /// Exactly one best candidate
    Selected(FunctionId),
    /// No candidate accepts the arguments
    NoMatch,
    /// Several incomparable minimal candidates accept the arguments
    Ambiguous(Vec<FunctionId>),
}

/// Selects an overload from `candidates` for the given argument types.
///
/// 1. Candidates whose signature failed to resolve (a parameter carries the
///    absorbing error type) are dropped: they were diagnosed at their
///    definition and must not compete here. The error type relates to every
///    type in both directions, so letting such a signature into the
///    dominance filter would make it tie with every rival and force a
///    spurious ambiguity.
/// 2. Candidates with the wrong arity are rejected.
/// 3. Every argument must be `<:` its parameter type.
/// 4. Among the survivors, the unique minimum of the component-wise `<:`
///    order on parameter vectors wins. The minimum is found with a pairwise
///    dominance filter, not a sort: the order is partial and may have
///    several minima (ambiguous) or none surviving step 3 (no match).
///
/// Selection is deterministic: identical candidate sets and argument types
/// always produce the same outcome.
#[must_use]
pub fn resolve_overload(
    program: &Program,
    candidates: &[FunctionId],
    arguments: &[TypeId],
) -> OverloadOutcome {
    let viable: Vec<FunctionId> = candidates
        .iter()
        .copied()
        .filter(|&candidate| {
            let params = program.parameter_types(candidate);
            params.len() == arguments.len()
                && !params.iter().any(|&param| program.is_error(param))
                && arguments.iter().zip(&params).all(|(&arg, &param)| program.is_subtype(arg, param))
        })
        .collect();

    if viable.is_empty() {
        return OverloadOutcome::NoMatch;
    }

    let minimal: Vec<FunctionId> = viable
        .iter()
        .copied()
        .filter(|&candidate| {
            let params = program.parameter_types(candidate);
            !viable.iter().any(|&other| {
                other != candidate && dominates(program, &program.parameter_types(other), &params)
            })
        })
        .collect();

    match minimal.as_slice() {
        [winner] => OverloadOutcome::Selected(*winner),
        [] => OverloadOutcome::Ambiguous(viable),
        _ => OverloadOutcome::Ambiguous(minimal),
    }
}

/// True if parameter vector `a` is strictly below `b` component-wise.
fn dominates(program: &Program, a: &[TypeId], b: &[TypeId]) -> bool {
    a != b && a.iter().zip(b).all(|(&x, &y)| program.is_subtype(x, y))
}

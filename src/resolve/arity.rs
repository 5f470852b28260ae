//! Argument-count matching.

use crate::library::FunctionContract;

/// Whether a call with `count` arguments matches `contract`.
///
/// With a format string or variadic argument the declared arguments are a
/// lower bound. Otherwise the count must equal the highest declared
/// position, or lie between the first optional position minus one and the
/// highest position when some argument is optional.
pub fn matches_arity(contract: &FunctionContract, count: usize) -> bool {
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    let max = contract.max_declared_arg();
    if contract.has_open_arity() {
        return count >= max;
    }
    match contract.first_optional_arg() {
        None => count == max,
        Some(first) => (first - 1..=max).contains(&count),
    }
}

//! Deallocation of an address with an offset.
//!
//! ```c
//! char *p = malloc(100);
//! free(p + 10);
//! ```

use rustc_hash::FxHashMap;
use tracing::trace;

use super::{CheckSettings, Diagnostic, codes};
use crate::base::GroupId;
use crate::resolve::{CallExpr, CallResolver, SymbolDatabase};
use crate::token::{Token, TokenList, VarId};

/// A variable holding the result of an allocation.
#[derive(Clone, Debug)]
struct Allocation {
    /// Allocating function, or `new`.
    via: String,
    /// Allocation group; `None` for `new`.
    group: Option<GroupId>,
    inconclusive: bool,
}

/// Report deallocations of `var + n` or `var - n` where `var` was assigned
/// from a library allocation of the same group in the same body. `delete`
/// pairs with `new`.
pub fn check_invalid_free<S: SymbolDatabase>(
    resolver: &CallResolver<'_, S>,
    body: &TokenList,
    settings: &CheckSettings,
) -> Vec<Diagnostic> {
    let mut allocations: FxHashMap<VarId, Allocation> = FxHashMap::default();
    let mut diagnostics = Vec::new();

    for i in 0..body.len() {
        let Some(tok) = body.get(i) else { break };

        if let Some(var) = assigned_var(body, i) {
            if let Some((via, group)) = allocation_source(resolver, body, i + 2) {
                trace!(var = var.0, via = %via, "tracking allocation");
                allocations.entry(var).or_insert(Allocation {
                    via,
                    group,
                    inconclusive: false,
                });
                continue;
            }

            let self_offset = body.get(i + 2).and_then(|t| t.var_id) == Some(var)
                && matches!(body.str_at(i + 3), "+" | "-");
            if self_offset && allocations.contains_key(&var) {
                if settings.inconclusive {
                    if let Some(allocation) = allocations.get_mut(&var) {
                        allocation.inconclusive = true;
                    }
                } else {
                    allocations.remove(&var);
                }
                continue;
            }

            allocations.remove(&var);
            continue;
        }

        if let Some((var_index, group)) = offset_deallocation(resolver, body, i) {
            let operands = [var_index, var_index + 2];
            let hit = operands.iter().find_map(|&index| {
                let var = body.get(index).and_then(|t| t.var_id)?;
                allocations.get(&var).filter(|allocation| allocation.group == group)
            });
            if let Some(allocation) = hit {
                diagnostics.push(invalid_free(tok, allocation));
            }
            continue;
        }

        if tok.is_name()
            && !tok.is_keyword
            && body.str_at(i + 1) == "("
            && !resolver.library().is_function_const_name(tok.str(), true)
        {
            let Some(close) = body.link(i + 1) else { continue };
            for arg in (i + 2..close).filter_map(|j| body.get(j)) {
                if let Some(var) = arg.var_id {
                    allocations.remove(&var);
                }
            }
        }
    }
    diagnostics
}

/// `%var% =` at `i`.
fn assigned_var(body: &TokenList, i: usize) -> Option<VarId> {
    let var = body.get(i)?.var_id?;
    (body.str_at(i + 1) == "=").then_some(var)
}

/// `new`, or the name and group of a library allocation called at `i`.
fn allocation_source<S: SymbolDatabase>(
    resolver: &CallResolver<'_, S>,
    body: &TokenList,
    i: usize,
) -> Option<(String, Option<GroupId>)> {
    let tok = body.get(i)?;
    if tok.str() == "new" {
        return Some(("new".to_string(), None));
    }
    if !tok.is_name() || body.str_at(i + 1) != "(" {
        return None;
    }
    let call = CallExpr::from_tokens(body, i)?;
    resolver
        .alloc_func_info(&call)
        .map(|af| (tok.str().to_string(), Some(af.group_id)))
}

/// Index of the first operand of `dealloc ( a +|- b`, `delete [ ] ( a +|- b`
/// or `delete a +|- b` starting at `i`, with the deallocation group.
fn offset_deallocation<S: SymbolDatabase>(
    resolver: &CallResolver<'_, S>,
    body: &TokenList,
    i: usize,
) -> Option<(usize, Option<GroupId>)> {
    let is_offset = |index: usize| matches!(body.str_at(index), "+" | "-");
    let tok = body.get(i)?;

    if tok.str() == "delete" {
        if body.str_at(i + 1) == "[" && body.str_at(i + 2) == "]" && body.str_at(i + 3) == "(" {
            return is_offset(i + 5).then_some((i + 4, None));
        }
        return (!body.str_at(i + 1).is_empty() && is_offset(i + 2) && body.get(i + 3).is_some())
            .then_some((i + 1, None));
    }

    if !tok.is_name() || body.str_at(i + 1) != "(" || !is_offset(i + 3) {
        return None;
    }
    let call = CallExpr::from_tokens(body, i)?;
    resolver
        .dealloc_func_info(&call)
        .map(|af| (i + 2, Some(af.group_id)))
}

fn invalid_free(tok: &Token, allocation: &Allocation) -> Diagnostic {
    let (via, deallocated) = if allocation.via == "new" {
        ("new".to_string(), "deleted")
    } else {
        (format!("{}()", allocation.via), "freed")
    };
    Diagnostic::error(
        tok.offset,
        format!(
            "Mismatching address is {deallocated}. The address you get from {via} must be {deallocated} without offset."
        ),
    )
    .with_code(codes::INVALID_FREE)
    .with_inconclusive(allocation.inconclusive)
}

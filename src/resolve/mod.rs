//! Call-site resolution against a [`Library`].
//!
//! [`CallResolver`] pairs a library with the analyzed program's
//! [`SymbolDatabase`] and answers questions about one call site at a time:
//!
//! 1. The fast-reject gate: keywords, standard types, variables and
//!    functions the program declares inside a class are never library calls.
//! 2. Qualified-name reconstruction of the callee, with a base-class
//!    fallback for unqualified calls inside class scopes and for member
//!    calls on a known static type.
//! 3. Arity matching of the resolved name against its contract.
//!
//! Queries never fail. A call that is not a modeled library function gives
//! `None`, `false` or the query's default.

mod arity;
mod expr;
mod name;
mod queries;
mod symbols;

use tracing::trace;

pub use arity::matches_arity;
pub use expr::{CallExpr, DeclScope, Declaration, Expr, Ident, ScopeId};
pub use symbols::{SymbolDatabase, SymbolMap, Variable};

use crate::library::{FunctionContract, Library};

/// A call site resolved to a library contract.
#[derive(Clone, Copy, Debug)]
pub struct Resolved<'a> {
    pub contract: &'a FunctionContract,
}

/// Resolves call sites of one analyzed program against one library.
#[derive(Clone, Copy, Debug)]
pub struct CallResolver<'a, S> {
    library: &'a Library,
    symbols: &'a S,
}

impl<'a, S: SymbolDatabase> CallResolver<'a, S> {
    pub fn new(library: &'a Library, symbols: &'a S) -> Self {
        Self { library, symbols }
    }

    pub fn library(&self) -> &'a Library {
        self.library
    }

    /// Whether `call` can not be a call of a modeled library function.
    pub fn is_not_library_function(&self, call: &CallExpr) -> bool {
        self.resolve(call).is_none()
    }

    /// Contract of `name` if it exists and accepts the arity of `call`.
    pub fn match_arguments(&self, name: &str, call: &CallExpr) -> Option<&'a FunctionContract> {
        let contract = self.library.function_by_name(name)?;
        matches_arity(contract, call.arg_count()).then_some(contract)
    }

    /// Gate, name resolution and arity match in one step.
    pub fn resolve(&self, call: &CallExpr) -> Option<Resolved<'a>> {
        if rejected_by_gate(call) {
            return None;
        }
        let name = self.callee_name(call)?;
        let contract = self.match_arguments(&name, call);
        trace!(callee = %name, matched = contract.is_some(), "resolved call site");
        contract.map(|contract| Resolved { contract })
    }

    /// Contract of the library function `call` invokes.
    pub fn function(&self, call: &CallExpr) -> Option<&'a FunctionContract> {
        self.resolve(call).map(|r| r.contract)
    }
}

/// Keywords, standard types, variables and class-nested declarations.
fn rejected_by_gate(call: &CallExpr) -> bool {
    let Some(ident) = call.callee_ident() else {
        return true;
    };
    ident.is_keyword
        || ident.is_standard_type
        || ident.var_id.is_some()
        || ident
            .declaration
            .is_some_and(|decl| decl.scope == DeclScope::Nested)
}

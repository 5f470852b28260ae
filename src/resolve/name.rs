//! Qualified-name reconstruction of callees.

use tracing::trace;

use super::expr::{CallExpr, Expr};
use super::symbols::SymbolDatabase;
use super::CallResolver;
use crate::base::{join_qualified, strip_global_qualifier};

impl<S: SymbolDatabase> CallResolver<'_, S> {
    /// Best-effort fully qualified name of the function `call` invokes,
    /// without a leading `::`.
    pub fn callee_name(&self, call: &CallExpr) -> Option<String> {
        let name = self.expr_name(&call.callee, call, false)?;
        Some(strip_global_qualifier(&name).to_string())
    }

    /// `qualified` is set for operands of `::`, which never probe base
    /// classes.
    fn expr_name(&self, expr: &Expr, call: &CallExpr, qualified: bool) -> Option<String> {
        match expr {
            Expr::Name(ident) if qualified => Some(ident.text.to_string()),
            Expr::Name(ident) => Some(self.unqualified_name(ident.as_str(), call)),
            Expr::Scope {
                qualifier: None,
                name,
            } => self.expr_name(name, call, true),
            Expr::Scope {
                qualifier: Some(qualifier),
                name,
            } => {
                let qualifier = self.expr_name(qualifier, call, true)?;
                let name = self.expr_name(name, call, true)?;
                Some(join_qualified(&qualifier, &name))
            }
            Expr::Member {
                object,
                member,
                arrow,
            } => {
                let ty = self.symbols.canonical_type(object, *arrow)?;
                Some(self.member_name(&ty, member.as_str(), call))
            }
            Expr::Call(_) | Expr::Other(_) => None,
        }
    }

    /// The plain name if it matches, else the first `<base>::name` of an
    /// enclosing class that matches, else the plain name.
    fn unqualified_name(&self, name: &str, call: &CallExpr) -> String {
        if self.match_arguments(name, call).is_some() {
            return name.to_string();
        }
        for class in self.symbols.enclosing_classes(call.scope) {
            if let Some(candidate) = self.first_matching_base(&class, name, call) {
                return candidate;
            }
        }
        name.to_string()
    }

    /// `<type>::member` if the library has it, else the first matching
    /// `<base>::member` of that type.
    fn member_name(&self, ty: &str, member: &str, call: &CallExpr) -> String {
        let direct = join_qualified(strip_global_qualifier(ty), member);
        if self.library.has_function(&direct) {
            return direct;
        }
        self.first_matching_base(ty, member, call).unwrap_or(direct)
    }

    fn first_matching_base(&self, class: &str, name: &str, call: &CallExpr) -> Option<String> {
        self.symbols.base_classes(class).into_iter().find_map(|base| {
            let candidate = join_qualified(strip_global_qualifier(&base), name);
            let matched = self.match_arguments(&candidate, call).is_some();
            trace!(class, candidate = %candidate, matched, "base class probe");
            matched.then_some(candidate)
        })
    }
}

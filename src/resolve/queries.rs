//! Call-site queries over resolved contracts.

use std::collections::BTreeMap;

use tracing::trace;

use super::expr::{CallExpr, Expr, Ident};
use super::symbols::SymbolDatabase;
use super::CallResolver;
use crate::base::{ArgNr, GroupId};
use crate::library::{
    Action, AllocFunc, ArgumentContract, Container, Direction, FunctionContract, NoReturn,
    NonOverlappingData, UseRetVal, WarnInfo, Yield,
};
use crate::token::{Token, TokenList};

impl<'a, S: SymbolDatabase> CallResolver<'a, S> {
    /// Argument contract at `argnr`, falling back to the `any` entry.
    pub fn arg(&self, call: &CallExpr, argnr: ArgNr) -> Option<&'a ArgumentContract> {
        self.function(call)?.arg(argnr)
    }

    /// Contract found by name alone, without the gate or arity match.
    fn contract_by_name(&self, call: &CallExpr) -> Option<&'a FunctionContract> {
        self.library.function_by_name(&self.callee_name(call)?)
    }

    fn declaration(call: &CallExpr) -> Option<super::Declaration> {
        call.callee_ident().and_then(|ident| ident.declaration)
    }

    // ---- control flow and purity ----

    /// Whether the call never returns. `maybe` counts as no-return.
    pub fn is_noreturn(&self, call: &CallExpr) -> bool {
        if Self::declaration(call).is_some_and(|d| d.is_noreturn) {
            return true;
        }
        self.function(call)
            .is_some_and(|f| matches!(f.noreturn, Some(NoReturn::True | NoReturn::Maybe)))
    }

    /// Whether the call is known to return.
    pub fn is_not_noreturn(&self, call: &CallExpr) -> bool {
        if Self::declaration(call).is_some_and(|d| d.is_noreturn) {
            return false;
        }
        match self.function(call) {
            Some(f) => f.noreturn == Some(NoReturn::False),
            None => self
                .callee_name(call)
                .is_some_and(|name| self.library.has_any_type_check(&name)),
        }
    }

    /// Whether the scope closed by the `}` at `end` finishes with a call
    /// that does not return. A callee assumed not to return because nothing
    /// is known about it is returned alongside.
    pub fn is_scope_noreturn(&self, body: &TokenList, end: usize) -> (bool, Option<String>) {
        if end < 3 || body.str_at(end) != "}" || body.str_at(end - 1) != ";" || body.str_at(end - 2) != ")" {
            return (false, None);
        }
        let Some(mut name_index) = body.link(end - 2).and_then(|open| open.checked_sub(1)) else {
            return (false, None);
        };
        if statement_head(body, name_index) == "throw" {
            return (true, None);
        }

        let pointer_call = name_index >= 3
            && body.str_at(name_index) == ")"
            && body.str_at(name_index - 2) == "*"
            && body.str_at(name_index - 3) == "("
            && body.get(name_index - 1).is_some_and(Token::is_name);
        let start = if pointer_call {
            name_index -= 1;
            name_index.checked_sub(3)
        } else if body.get(name_index).is_some_and(Token::is_name) {
            let mut start = Some(name_index);
            while let Some(i) = start {
                if !(body.get(i).is_some_and(Token::is_name) || matches!(body.str_at(i), "." | "::")) {
                    break;
                }
                start = i.checked_sub(1);
            }
            start
        } else {
            return (false, None);
        };

        if !start.is_some_and(|i| matches!(body.str_at(i), ";" | "{" | "}")) {
            return (false, None);
        }
        let Some(tok) = body.get(name_index) else {
            return (false, None);
        };
        if tok.is_keyword {
            return (false, None);
        }
        if tok.str() == "exit" {
            return (true, None);
        }
        let call = if pointer_call {
            Some(CallExpr::new(Expr::Name(Ident::from(tok)), Vec::new()))
        } else {
            CallExpr::from_tokens(body, name_index)
        };
        let Some(call) = call else {
            return (false, None);
        };
        if self.is_not_noreturn(&call) {
            return (false, None);
        }
        let unknown = (!self.is_noreturn(&call)).then(|| tok.str().to_string());
        trace!(callee = tok.str(), unknown = unknown.is_some(), "scope ends in no-return call");
        (true, unknown)
    }

    pub fn is_function_const(&self, call: &CallExpr) -> bool {
        if Self::declaration(call).is_some_and(|d| d.is_const) {
            return true;
        }
        match self.function(call) {
            Some(f) => f.is_const,
            None => matches!(
                self.container_yield(call),
                Yield::Empty | Yield::Size | Yield::BufferNt
            ),
        }
    }

    pub fn use_retval_type(&self, call: &CallExpr) -> UseRetVal {
        if let Some(f) = self.function(call) {
            return f.use_retval;
        }
        match self.container_yield(call) {
            Yield::StartIterator
            | Yield::EndIterator
            | Yield::AtIndex
            | Yield::Size
            | Yield::Empty
            | Yield::Buffer
            | Yield::BufferNt => UseRetVal::Default,
            Yield::Item | Yield::Iterator if self.container_action(call) == Action::NoAction => {
                UseRetVal::Default
            }
            _ => UseRetVal::None,
        }
    }

    // ---- return values ----

    pub fn return_value(&self, call: &CallExpr) -> Option<&'a str> {
        self.function(call)?.return_value.expr.as_deref()
    }

    /// Declared return type, or the container member's `returnType` for a
    /// member call that is not itself a library function.
    pub fn return_value_type(&self, call: &CallExpr) -> Option<&'a str> {
        match self.function(call) {
            Some(f) => f.return_value.type_name.as_deref(),
            None => {
                let (container, member) = self.member_container(call)?;
                container.return_type_of(member)
            }
        }
    }

    pub fn return_value_container(&self, call: &CallExpr) -> Option<i32> {
        self.function(call)?.return_value.container
    }

    pub fn unknown_return_values(&self, call: &CallExpr) -> &'a [i64] {
        self.function(call)
            .map(|f| f.unknown_return_values.as_slice())
            .unwrap_or_default()
    }

    // ---- arguments ----

    pub fn has_minsize(&self, call: &CallExpr) -> bool {
        self.function(call).is_some_and(FunctionContract::has_minsize)
    }

    /// Direction of argument `argnr` at pointer depth `indirect`.
    ///
    /// Arguments without a contract at or after the format string of a
    /// format function are outputs for scan functions and inputs otherwise.
    pub fn arg_direction(&self, call: &CallExpr, argnr: ArgNr, indirect: i32) -> Direction {
        if let Some(arg) = self.arg(call, argnr) {
            return arg.direction_at(indirect);
        }
        if !self.formatstr_function(call) {
            return Direction::Unknown;
        }
        match self.formatstr_argno(call) {
            Some(format_arg) if argnr >= format_arg => {
                if self.formatstr_scan(call) {
                    Direction::Out
                } else {
                    Direction::In
                }
            }
            _ => Direction::Unknown,
        }
    }

    /// Scan format functions also reject null for undeclared arguments.
    pub fn is_null_arg_bad(&self, call: &CallExpr, argnr: ArgNr) -> bool {
        match self.arg(call, argnr) {
            Some(arg) => arg.not_null,
            None => self
                .contract_by_name(call)
                .is_some_and(|f| f.formatstr && f.formatstr_scan),
        }
    }

    /// Non-scan format functions also reject uninitialized undeclared
    /// arguments.
    pub fn is_uninit_arg_bad(&self, call: &CallExpr, argnr: ArgNr, indirect: u32) -> bool {
        match self.arg(call, argnr) {
            Some(arg) => arg.not_uninit.is_some_and(|depth| depth >= indirect),
            None => self
                .contract_by_name(call)
                .is_some_and(|f| f.formatstr && !f.formatstr_scan),
        }
    }

    /// Whether argument `argnr` must be initialized through a pointer.
    pub fn has_indirect_uninit_check(&self, call: &CallExpr, argnr: ArgNr) -> bool {
        self.arg(call, argnr)
            .is_some_and(|arg| arg.not_uninit.is_some_and(|depth| depth >= 1))
    }

    pub fn is_int_arg_valid(&self, call: &CallExpr, argnr: ArgNr, value: i64) -> bool {
        self.arg(call, argnr)
            .and_then(|arg| arg.valid.as_ref())
            .is_none_or(|valid| valid.is_int_valid(value))
    }

    pub fn is_float_arg_valid(&self, call: &CallExpr, argnr: ArgNr, value: f64) -> bool {
        self.arg(call, argnr)
            .and_then(|arg| arg.valid.as_ref())
            .is_none_or(|valid| valid.is_float_valid(value))
    }

    // ---- format strings and warnings ----

    pub fn formatstr_function(&self, call: &CallExpr) -> bool {
        self.function(call).is_some_and(|f| f.formatstr)
    }

    /// Position of the format string argument.
    pub fn formatstr_argno(&self, call: &CallExpr) -> Option<ArgNr> {
        self.contract_by_name(call)?.formatstr_arg()
    }

    pub fn formatstr_scan(&self, call: &CallExpr) -> bool {
        self.contract_by_name(call).is_some_and(|f| f.formatstr_scan)
    }

    pub fn formatstr_secure(&self, call: &CallExpr) -> bool {
        self.contract_by_name(call).is_some_and(|f| f.formatstr_secure)
    }

    pub fn warn_info(&self, call: &CallExpr) -> Option<&'a WarnInfo> {
        self.function(call)?.warn.as_ref()
    }

    pub fn non_overlapping_data(&self, call: &CallExpr) -> Option<&'a NonOverlappingData> {
        self.function(call)?.non_overlapping_data.as_ref()
    }

    // ---- allocation ----

    pub fn alloc_func_info(&self, call: &CallExpr) -> Option<&'a AllocFunc> {
        self.alloc_entry(&self.library.alloc, call)
    }

    pub fn dealloc_func_info(&self, call: &CallExpr) -> Option<&'a AllocFunc> {
        self.alloc_entry(&self.library.dealloc, call)
    }

    pub fn realloc_func_info(&self, call: &CallExpr) -> Option<&'a AllocFunc> {
        self.alloc_entry(&self.library.realloc, call)
    }

    /// Group of the allocation `call` performs into argument `arg`
    /// (-1 for the return value).
    pub fn alloc_id(&self, call: &CallExpr, arg: ArgNr) -> Option<GroupId> {
        group_for_arg(self.alloc_func_info(call), arg)
    }

    pub fn dealloc_id(&self, call: &CallExpr, arg: ArgNr) -> Option<GroupId> {
        group_for_arg(self.dealloc_func_info(call), arg)
    }

    pub fn realloc_id(&self, call: &CallExpr, arg: ArgNr) -> Option<GroupId> {
        group_for_arg(self.realloc_func_info(call), arg)
    }

    /// A function contract for the same name shadows the table entry
    /// unless the call passes the gate and arity match.
    fn alloc_entry(
        &self,
        table: &'a BTreeMap<String, AllocFunc>,
        call: &CallExpr,
    ) -> Option<&'a AllocFunc> {
        let name = self.callee_name(call)?;
        if self.library.has_function(&name) && self.is_not_library_function(call) {
            trace!(callee = %name, "function contract shadows allocation entry");
            return None;
        }
        crate::library::lookup_alloc(table, &name)
    }

    // ---- containers ----

    /// Container descriptor of the object of a member call, with the
    /// member name.
    fn member_container<'c>(&self, call: &'c CallExpr) -> Option<(&'a Container, &'c str)> {
        let Expr::Member { object, member, .. } = call.callee.without_global_qualifier() else {
            return None;
        };
        let id = self.symbols.container_of(object)?;
        let container = self.library.container(&id)?;
        Some((container, member.as_str()))
    }

    /// Yield of a container member call, `NoYield` for anything else.
    pub fn container_yield(&self, call: &CallExpr) -> Yield {
        self.member_container(call)
            .map(|(container, member)| container.yield_of(member))
            .unwrap_or_default()
    }

    /// Action of a container member call, `NoAction` for anything else.
    pub fn container_action(&self, call: &CallExpr) -> Action {
        self.member_container(call)
            .map(|(container, member)| container.action_of(member))
            .unwrap_or_default()
    }
}

/// First token of the statement containing `index`.
fn statement_head(body: &TokenList, index: usize) -> &str {
    let mut i = index;
    while i > 0 && !matches!(body.str_at(i - 1), ";" | "{" | "}") {
        i -= 1;
    }
    body.str_at(i)
}

fn group_for_arg(entry: Option<&AllocFunc>, arg: ArgNr) -> Option<GroupId> {
    entry.filter(|af| af.arg == arg).map(|af| af.group_id)
}

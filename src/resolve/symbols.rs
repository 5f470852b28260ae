//! The symbol database seam.

use rustc_hash::FxHashMap;

use super::expr::{Expr, ScopeId};

/// What the resolver asks of the analyzed program's symbol database.
pub trait SymbolDatabase {
    /// Classes enclosing `scope`, innermost first.
    fn enclosing_classes(&self, scope: ScopeId) -> Vec<String>;

    /// Direct base classes of `class`, qualified as written in the source.
    fn base_classes(&self, class: &str) -> Vec<String>;

    /// Declared type of the value of `expr`, e.g. `std::string`.
    ///
    /// With `through_pointer` the type pointed to is asked for, and an
    /// expression that is not a pointer has none.
    fn canonical_type(&self, expr: &Expr, through_pointer: bool) -> Option<String>;

    /// Container descriptor id of the value of `expr`.
    fn container_of(&self, expr: &Expr) -> Option<String>;
}

/// A declared variable as recorded in a [`SymbolMap`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Variable {
    pub type_name: String,
    pub pointer: bool,
    pub container: Option<String>,
}

/// In-memory [`SymbolDatabase`] keyed by names.
#[derive(Clone, Debug, Default)]
pub struct SymbolMap {
    scopes: FxHashMap<ScopeId, Vec<String>>,
    bases: FxHashMap<String, Vec<String>>,
    variables: FxHashMap<String, Variable>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `scope` as nested in `classes`, innermost first.
    pub fn scope(&mut self, scope: ScopeId, classes: &[&str]) -> &mut Self {
        self.scopes
            .insert(scope, classes.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn class(&mut self, class: &str, bases: &[&str]) -> &mut Self {
        self.bases
            .insert(class.to_string(), bases.iter().map(|b| b.to_string()).collect());
        self
    }

    pub fn variable(&mut self, name: &str, variable: Variable) -> &mut Self {
        self.variables.insert(name.to_string(), variable);
        self
    }

    fn variable_of(&self, expr: &Expr) -> Option<&Variable> {
        match expr {
            Expr::Name(ident) => self.variables.get(ident.as_str()),
            _ => None,
        }
    }
}

impl SymbolDatabase for SymbolMap {
    fn enclosing_classes(&self, scope: ScopeId) -> Vec<String> {
        self.scopes.get(&scope).cloned().unwrap_or_default()
    }

    fn base_classes(&self, class: &str) -> Vec<String> {
        self.bases.get(class).cloned().unwrap_or_default()
    }

    fn canonical_type(&self, expr: &Expr, through_pointer: bool) -> Option<String> {
        self.variable_of(expr)
            .filter(|v| v.pointer == through_pointer)
            .map(|v| v.type_name.clone())
    }

    fn container_of(&self, expr: &Expr) -> Option<String> {
        self.variable_of(expr).and_then(|v| v.container.clone())
    }
}

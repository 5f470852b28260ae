//! Call-site expressions handed to the resolver.
//!
//! This is the slice of a syntax tree the resolver needs: callee shape,
//! argument count and the per-identifier facts a tokenizer and symbol
//! database already know.

use smol_str::SmolStr;

use crate::token::{Token, TokenList, VarId};

/// Scope a call occurs in, as numbered by the symbol database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// Where a function the analyzed code declares itself lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclScope {
    Global,
    /// Inside a class, namespace or function body.
    Nested,
}

/// A declaration the analyzed code provides for a callee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub scope: DeclScope,
    pub is_const: bool,
    pub is_noreturn: bool,
}

/// An identifier with the facts the tokenizer and symbol database attach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub text: SmolStr,
    pub var_id: Option<VarId>,
    pub is_keyword: bool,
    pub is_standard_type: bool,
    pub declaration: Option<Declaration>,
}

impl Ident {
    pub fn new(text: impl Into<SmolStr>) -> Self {
        let text = text.into();
        let is_keyword = crate::token::is_keyword(&text);
        let is_standard_type = crate::token::is_standard_type(&text);
        Self {
            text,
            var_id: None,
            is_keyword,
            is_standard_type,
            declaration: None,
        }
    }

    pub fn variable(text: impl Into<SmolStr>, id: VarId) -> Self {
        Self {
            var_id: Some(id),
            ..Self::new(text)
        }
    }

    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&Token> for Ident {
    fn from(token: &Token) -> Self {
        Self {
            text: token.text.clone(),
            var_id: token.var_id,
            is_keyword: token.is_keyword,
            is_standard_type: token.is_standard_type,
            declaration: None,
        }
    }
}

/// Operand chain of a callee or argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Name(Ident),
    /// `qualifier :: name`, or `:: name` without a qualifier.
    Scope {
        qualifier: Option<Box<Expr>>,
        name: Box<Expr>,
    },
    /// `object . member` or `object -> member`.
    Member {
        object: Box<Expr>,
        member: Ident,
        arrow: bool,
    },
    Call(Box<CallExpr>),
    /// Anything the resolver does not look into.
    Other(String),
}

impl Expr {
    pub fn name(text: &str) -> Self {
        Expr::Name(Ident::new(text))
    }

    /// `a::b::c` from its parts; a leading empty part means `::`.
    pub fn qualified(parts: &[&str]) -> Self {
        let mut iter = parts.iter();
        let mut expr = match iter.next() {
            Some(first) if first.is_empty() => None,
            Some(first) => Some(Expr::name(first)),
            None => return Expr::Other(String::new()),
        };
        for part in iter {
            expr = Some(Expr::Scope {
                qualifier: expr.map(Box::new),
                name: Box::new(Expr::name(part)),
            });
        }
        expr.unwrap_or_else(|| Expr::Other(String::new()))
    }

    pub fn member(object: Expr, member: &str) -> Self {
        Expr::Member {
            object: Box::new(object),
            member: Ident::new(member),
            arrow: false,
        }
    }

    pub fn arrow(object: Expr, member: &str) -> Self {
        Expr::Member {
            object: Box::new(object),
            member: Ident::new(member),
            arrow: true,
        }
    }

    /// The identifier naming the called function: the rightmost name.
    pub fn rightmost_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Name(ident) => Some(ident),
            Expr::Scope { name, .. } => name.rightmost_ident(),
            Expr::Member { member, .. } => Some(member),
            Expr::Call(_) | Expr::Other(_) => None,
        }
    }

    /// `::x` unwrapped to `x`, repeatedly.
    pub fn without_global_qualifier(&self) -> &Expr {
        match self {
            Expr::Scope {
                qualifier: None,
                name,
            } => name.without_global_qualifier(),
            other => other,
        }
    }
}

/// One call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Expr>,
    pub scope: ScopeId,
}

impl CallExpr {
    pub fn new(callee: Expr, args: Vec<Expr>) -> Self {
        Self {
            callee,
            args,
            scope: ScopeId::GLOBAL,
        }
    }

    /// Call of a plain or qualified name with `arity` placeholder arguments.
    pub fn named(name: &str, arity: usize) -> Self {
        let parts: Vec<&str> = name.split("::").collect();
        Self::new(
            Expr::qualified(&parts),
            (0..arity).map(|i| Expr::Other(format!("arg{}", i + 1))).collect(),
        )
    }

    pub fn in_scope(mut self, scope: ScopeId) -> Self {
        self.scope = scope;
        self
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn callee_ident(&self) -> Option<&Ident> {
        self.callee.rightmost_ident()
    }

    /// Build the call whose `(` follows the name token at `name_index`.
    ///
    /// The callee is read backwards over `a :: b` chains and a preceding
    /// `object .` or `object ->`; arguments are split at top-level commas.
    pub fn from_tokens(tokens: &TokenList, name_index: usize) -> Option<Self> {
        let name = tokens.get(name_index).filter(|t| t.is_name())?;
        let open = name_index + 1;
        if tokens.str_at(open) != "(" {
            return None;
        }
        let close = tokens.link(open)?;

        let mut callee = Expr::Name(Ident::from(name));
        let mut i = name_index;
        while i >= 2 && tokens.str_at(i - 1) == "::" && tokens.get(i - 2).is_some_and(Token::is_name) {
            let qualifier = Expr::Name(Ident::from(tokens.get(i - 2)?));
            callee = prepend_qualifier(qualifier, callee);
            i -= 2;
        }
        if i >= 1 && tokens.str_at(i - 1) == "::" {
            callee = Expr::Scope {
                qualifier: None,
                name: Box::new(callee),
            };
        } else if i >= 2 && matches!(tokens.str_at(i - 1), "." | "->") {
            if let (Some(object), Expr::Name(member)) = (tokens.get(i - 2), &callee) {
                callee = Expr::Member {
                    object: Box::new(Expr::Name(Ident::from(object))),
                    member: member.clone(),
                    arrow: tokens.str_at(i - 1) == "->",
                };
            }
        }

        Some(Self::new(callee, split_args(tokens, open + 1, close)))
    }
}

/// Put `qualifier` in front of the leftmost part of `expr`.
fn prepend_qualifier(qualifier: Expr, expr: Expr) -> Expr {
    match expr {
        Expr::Scope {
            qualifier: Some(inner),
            name,
        } => Expr::Scope {
            qualifier: Some(Box::new(prepend_qualifier(qualifier, *inner))),
            name,
        },
        other => Expr::Scope {
            qualifier: Some(Box::new(qualifier)),
            name: Box::new(other),
        },
    }
}

fn split_args(tokens: &TokenList, start: usize, end: usize) -> Vec<Expr> {
    let mut args = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut i = start;
    while i < end {
        let text = tokens.str_at(i);
        if text == "," {
            args.push(Expr::Other(current.join(" ")));
            current.clear();
            i += 1;
            continue;
        }
        let next = match tokens.link(i) {
            Some(link) if link > i && matches!(text, "(" | "[" | "{" | "<") => link,
            _ => i,
        };
        for j in i..=next {
            current.push(tokens.str_at(j));
        }
        i = next + 1;
    }
    if !current.is_empty() || !args.is_empty() {
        args.push(Expr::Other(current.join(" ")));
    }
    args
}

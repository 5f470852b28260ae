//! Token-sequence patterns.
//!
//! Patterns are written as space separated words, one word per token:
//!
//! ```text
//! std :: vector <                      literal tokens
//! > :: iterator|const_iterator         alternation
//! const| %type%                        optional word (empty alternative)
//! > !!::                               "no token or anything but ::"
//! %name% %num% %var% %any% %type% ...  token classes
//! ```
//!
//! A pattern is compiled once and then matched as a prefix of a token list
//! starting at a given index.

use smol_str::SmolStr;
use thiserror::Error;

use super::list::{Token, TokenKind, TokenList};
use crate::base::constants::STD_NAMESPACE;

/// A pattern word could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern word '{word}' in '{pattern}'")]
pub struct PatternError {
    pub pattern: String,
    pub word: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Matcher {
    Literal(SmolStr),
    Name,
    Var,
    Num,
    Any,
    Type,
    Str,
    Char,
    Bool,
    Op,
    Or,
    OrOr,
}

impl Matcher {
    fn parse(word: &str) -> Option<Self> {
        let matcher = match word {
            "%name%" => Matcher::Name,
            "%var%" => Matcher::Var,
            "%num%" => Matcher::Num,
            "%any%" => Matcher::Any,
            "%type%" => Matcher::Type,
            "%str%" => Matcher::Str,
            "%char%" => Matcher::Char,
            "%bool%" => Matcher::Bool,
            "%op%" => Matcher::Op,
            "%or%" => Matcher::Or,
            "%oror%" => Matcher::OrOr,
            w if w.len() > 2 && w.starts_with('%') && w.ends_with('%') => return None,
            w => Matcher::Literal(SmolStr::new(w)),
        };
        Some(matcher)
    }

    fn matches(&self, token: &Token) -> bool {
        match self {
            Matcher::Literal(text) => token.text == *text,
            Matcher::Name => is_name(token),
            Matcher::Var => token.var_id.is_some(),
            Matcher::Num => token.kind == TokenKind::Number,
            Matcher::Any => true,
            Matcher::Type => is_name(token) && token.var_id.is_none() && token.text != "delete",
            Matcher::Str => token.kind == TokenKind::String,
            Matcher::Char => token.kind == TokenKind::Char,
            Matcher::Bool => token.text == "true" || token.text == "false",
            Matcher::Op => token.kind == TokenKind::Punct && OPERATORS.contains(&token.str()),
            Matcher::Or => token.text == "|",
            Matcher::OrOr => token.text == "||",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PatternItem {
    /// One of `choices`; with `optional` a mismatch consumes nothing.
    Choice { choices: Vec<Matcher>, optional: bool },
    /// Matches end of input or any token other than the literal.
    Not(SmolStr),
}

/// A compiled token-sequence pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPattern {
    source: String,
    items: Vec<PatternItem>,
}

impl TokenPattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let error = |word: &str| PatternError {
            pattern: pattern.to_string(),
            word: word.to_string(),
        };

        let mut items = Vec::new();
        for word in pattern.split_whitespace() {
            if let Some(negated) = word.strip_prefix("!!").filter(|rest| !rest.is_empty()) {
                items.push(PatternItem::Not(SmolStr::new(negated)));
                continue;
            }
            if word == "|" || word == "||" || !word.contains('|') {
                let matcher = Matcher::parse(word).ok_or_else(|| error(word))?;
                items.push(PatternItem::Choice {
                    choices: vec![matcher],
                    optional: false,
                });
                continue;
            }
            let mut choices = Vec::new();
            let mut optional = false;
            for alternative in word.split('|') {
                if alternative.is_empty() {
                    optional = true;
                } else {
                    choices.push(Matcher::parse(alternative).ok_or_else(|| error(word))?);
                }
            }
            items.push(PatternItem::Choice { choices, optional });
        }

        Ok(Self {
            source: pattern.to_string(),
            items,
        })
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append the words of `suffix` to this pattern.
    pub fn extended(&self, suffix: &str) -> Result<Self, PatternError> {
        TokenPattern::compile(&format!("{} {}", self.source, suffix))
    }

    /// Whether the pattern starts with the literal words `std ::`.
    pub fn has_std_prefix(&self) -> bool {
        matches!(
            self.items.as_slice(),
            [
                PatternItem::Choice { choices: first, optional: false },
                PatternItem::Choice { choices: second, optional: false },
                ..
            ] if first.as_slice() == [Matcher::Literal(SmolStr::new(STD_NAMESPACE))]
                && second.as_slice() == [Matcher::Literal(SmolStr::new("::"))]
        )
    }

    /// Match the pattern as a prefix of `tokens` starting at `start`.
    pub fn matches(&self, tokens: &TokenList, start: usize) -> bool {
        Self::match_items(&self.items, tokens, start)
    }

    /// Like [`matches`](Self::matches), but skips a leading `std ::` of the
    /// pattern when `without_std` is set and the pattern has one.
    pub fn matches_without_std(&self, tokens: &TokenList, start: usize, without_std: bool) -> bool {
        let skip = if without_std && self.has_std_prefix() { 2 } else { 0 };
        Self::match_items(&self.items[skip..], tokens, start)
    }

    fn match_items(items: &[PatternItem], tokens: &TokenList, start: usize) -> bool {
        let mut pos = start;
        for item in items {
            let token = tokens.get(pos);
            match item {
                PatternItem::Not(text) => match token {
                    None => {}
                    Some(token) if token.text == *text => return false,
                    Some(_) => pos += 1,
                },
                PatternItem::Choice { choices, optional } => match token {
                    Some(token) if choices.iter().any(|m| m.matches(token)) => pos += 1,
                    _ if *optional => {}
                    _ => return false,
                },
            }
        }
        true
    }
}

fn is_name(token: &Token) -> bool {
    token.kind == TokenKind::Name
        && token
            .text
            .chars()
            .next()
            .is_some_and(|c| c == '_' || unicode_ident::is_xid_start(c))
}

const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "&", "|", "^", "~", "!", "<", ">", "<=", ">=", "==", "!=",
    "&&", "||", "<<", "=", "+=", "-=", "*=", "/=", "++", "--",
];

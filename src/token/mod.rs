//! Token model of analyzed source.
//!
//! The tokenizer of the analyzed language is an external collaborator; this
//! module holds the small part of its interface the library needs:
//!
//! - [`TokenList`] - Flat token sequence with bracket links and variable ids
//! - [`TokenPattern`] - Token-sequence patterns compiled once at load time
//! - [`lexer`] - A logos lexer for C/C++ text, used to build token lists

pub mod lexer;
mod list;
mod pattern;

pub(crate) use list::{is_keyword, is_standard_type};
pub use list::{Token, TokenKind, TokenList, VarId};
pub use pattern::{PatternError, TokenPattern};

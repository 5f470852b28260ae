//! Logos-based lexer for C and C++ source text.
//!
//! Comments and whitespace are skipped. `>` is always emitted as a single
//! character token so that nested template argument lists close one level
//! per token.

use logos::Logos;
use text_size::TextSize;

use super::list::TokenKind;

/// A lexed token borrowing from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Lexeme<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(LogosToken::Ident) => TokenKind::Name,
            Ok(LogosToken::Number) => TokenKind::Number,
            Ok(LogosToken::String) => TokenKind::String,
            Ok(LogosToken::Char) => TokenKind::Char,
            Ok(LogosToken::Punct) => TokenKind::Punct,
            Err(()) => TokenKind::Unknown,
        };

        Some(Lexeme { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec.
pub fn tokenize(input: &str) -> Vec<Lexeme<'_>> {
    Lexer::new(input).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum LogosToken {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\]|\\.)*'")]
    Char,

    #[token("::")]
    #[token("->")]
    #[token("++")]
    #[token("--")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token("<<")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("...")]
    #[regex(r"[(){}\[\];,.<>=+\-*/%&|^!~?:#]")]
    Punct,
}

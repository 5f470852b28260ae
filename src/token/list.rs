//! Flat token sequence with bracket links.

use smol_str::SmolStr;
use text_size::TextSize;

use super::lexer::Lexer;

/// Lexical class of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Char,
    Punct,
    Unknown,
}

/// Variable id assigned by the symbol database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub u32);

/// One token of analyzed source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: SmolStr,
    pub kind: TokenKind,
    pub offset: TextSize,
    /// Index of the matching bracket, for `(`, `[`, `{` and template `<`.
    pub link: Option<usize>,
    pub var_id: Option<VarId>,
    pub is_keyword: bool,
    pub is_standard_type: bool,
}

impl Token {
    pub fn new(text: impl Into<SmolStr>, kind: TokenKind) -> Self {
        let text = text.into();
        let is_keyword = kind == TokenKind::Name && is_keyword(&text);
        let is_standard_type = kind == TokenKind::Name && is_standard_type(&text);
        Self {
            text,
            kind,
            offset: TextSize::new(0),
            link: None,
            var_id: None,
            is_keyword,
            is_standard_type,
        }
    }

    pub fn str(&self) -> &str {
        &self.text
    }

    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Name
    }

    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }
}

/// Token sequence of one declaration, statement or file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut list = Self { tokens };
        list.create_links();
        list
    }

    /// Lex `source` and link its brackets.
    pub fn tokenize(source: &str) -> Self {
        let tokens = Lexer::new(source)
            .map(|lexeme| {
                let mut token = Token::new(lexeme.text, lexeme.kind);
                token.offset = lexeme.offset;
                token
            })
            .collect();
        Self::new(tokens)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Text of the token at `index`, or `""` past the end.
    pub fn str_at(&self, index: usize) -> &str {
        self.tokens.get(index).map(Token::str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Index of the bracket matching the one at `index`.
    pub fn link(&self, index: usize) -> Option<usize> {
        self.tokens.get(index).and_then(|t| t.link)
    }

    /// Assign `id` to every name token spelled `name`.
    pub fn mark_variable(&mut self, name: &str, id: VarId) -> &mut Self {
        for token in &mut self.tokens {
            if token.is_name() && token.text == name {
                token.var_id = Some(id);
            }
        }
        self
    }

    /// Find the first index at or after `start` whose token is `text`.
    pub fn find(&self, start: usize, text: &str) -> Option<usize> {
        (start..self.tokens.len()).find(|&i| self.tokens[i].text == text)
    }

    fn create_links(&mut self) {
        let mut stack: Vec<usize> = Vec::new();
        for i in 0..self.tokens.len() {
            match self.tokens[i].str() {
                "(" | "[" | "{" => stack.push(i),
                ")" | "]" | "}" => {
                    let open = match self.tokens[i].str() {
                        ")" => "(",
                        "]" => "[",
                        _ => "{",
                    };
                    let top = match stack.last() {
                        Some(&top) if self.tokens[top].text == open => top,
                        _ => continue,
                    };
                    stack.pop();
                    self.tokens[top].link = Some(i);
                    self.tokens[i].link = Some(top);
                }
                _ => {}
            }
        }

        for i in 0..self.tokens.len() {
            if self.tokens[i].text != "<" || self.tokens[i].link.is_some() {
                continue;
            }
            let after_name = i > 0 && self.tokens[i - 1].is_name();
            if !after_name {
                continue;
            }
            if let Some(close) = self.find_template_end(i) {
                self.tokens[i].link = Some(close);
                self.tokens[close].link = Some(i);
            }
        }
    }

    /// Balanced scan for the `>` closing the template list opened at `open`.
    fn find_template_end(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut j = open + 1;
        while j < self.tokens.len() {
            let token = &self.tokens[j];
            match token.str() {
                "<" if j > 0 && self.tokens[j - 1].is_name() => depth += 1,
                ">" => {
                    if depth == 0 {
                        return Some(j);
                    }
                    depth -= 1;
                }
                "(" | "[" => j = token.link?,
                ";" | "{" | "}" | ")" | "]" | "&&" | "||" | "=" => return None,
                _ => {}
            }
            j += 1;
        }
        None
    }
}

const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "asm", "auto", "break", "case", "catch", "class", "const",
    "constexpr", "const_cast", "continue", "decltype", "default", "delete", "do",
    "dynamic_cast", "else", "enum", "explicit", "extern", "false", "for", "friend",
    "goto", "if", "inline", "mutable", "namespace", "new", "noexcept", "nullptr",
    "operator", "private", "protected", "public", "register", "reinterpret_cast",
    "return", "signed", "sizeof", "static", "static_assert", "static_cast", "struct",
    "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "volatile", "while",
];

const STANDARD_TYPES: &[&str] = &[
    "bool", "_Bool", "char", "double", "float", "int", "long", "short", "size_t",
    "void", "wchar_t",
];

pub(crate) fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

pub(crate) fn is_standard_type(text: &str) -> bool {
    STANDARD_TYPES.contains(&text)
}

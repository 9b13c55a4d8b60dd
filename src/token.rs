use crate::diagnostic::Span;
use serde_json::json;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Reserved words
    Devote,
    Inherit,
    Plunder,
    Forge,
    Cleave,
    Shatter,
    Judge,
    Exile,
    Vigil,
    March,
    Print,
    Unir,
    Menos,
    Parias,
    Inquire,
    Conquistar,
    Decree,
    Yield,

    // Literals and Identifiers
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Comparison Operators
    Greater,
    Less,
    GreaterEq,
    LessEq,
    Eq,
    NotEq,

    // Logical Operators
    And,
    Or,
    Bang,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
}

impl TokenKind {
    /// Maps a word to its reserved-word kind, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "devote" => TokenKind::Devote,
            "inherit" => TokenKind::Inherit,
            "plunder" => TokenKind::Plunder,
            "forge" => TokenKind::Forge,
            "cleave" => TokenKind::Cleave,
            "shatter" => TokenKind::Shatter,
            "judge" => TokenKind::Judge,
            "exile" => TokenKind::Exile,
            "vigil" => TokenKind::Vigil,
            "march" => TokenKind::March,
            "print" => TokenKind::Print,
            "unir" => TokenKind::Unir,
            "menos" => TokenKind::Menos,
            "parias" => TokenKind::Parias,
            "inquire" => TokenKind::Inquire,
            "conquistar" => TokenKind::Conquistar,
            "decree" => TokenKind::Decree,
            "yield" => TokenKind::Yield,
            _ => return None,
        };
        Some(kind)
    }

    /// Grammar-level name of the kind, used by the token dump.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Devote => "ASSIGN",
            TokenKind::Inherit => "ADD",
            TokenKind::Plunder => "SUBTRACT",
            TokenKind::Forge => "MULTIPLY",
            TokenKind::Cleave => "DIVIDE",
            TokenKind::Shatter => "MODULO",
            TokenKind::Judge => "IF",
            TokenKind::Exile => "ELSE",
            TokenKind::Vigil => "WHILE",
            TokenKind::March => "FOR",
            TokenKind::Print => "PRINT",
            TokenKind::Unir => "CONCAT",
            TokenKind::Menos => "NEGATE",
            TokenKind::Parias => "PARIAS",
            TokenKind::Inquire => "INQUIRE",
            TokenKind::Conquistar => "CONQUISTAR",
            TokenKind::Decree => "DECREE",
            TokenKind::Yield => "YIELD",
            TokenKind::Ident(_) => "IDENTIFIER",
            TokenKind::Int(_) | TokenKind::Float(_) => "NUMBER",
            TokenKind::Str(_) => "STRING",
            TokenKind::Greater => "GREATER",
            TokenKind::Less => "LESS",
            TokenKind::GreaterEq => "GREATER_EQ",
            TokenKind::LessEq => "LESS_EQ",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Bang => "NOT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
        }
    }
}

/// Source spelling of the token; string literals are shown without quotes,
/// the way the syntax error report names the offending token.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Devote => "devote",
            TokenKind::Inherit => "inherit",
            TokenKind::Plunder => "plunder",
            TokenKind::Forge => "forge",
            TokenKind::Cleave => "cleave",
            TokenKind::Shatter => "shatter",
            TokenKind::Judge => "judge",
            TokenKind::Exile => "exile",
            TokenKind::Vigil => "vigil",
            TokenKind::March => "march",
            TokenKind::Print => "print",
            TokenKind::Unir => "unir",
            TokenKind::Menos => "menos",
            TokenKind::Parias => "parias",
            TokenKind::Inquire => "inquire",
            TokenKind::Conquistar => "conquistar",
            TokenKind::Decree => "decree",
            TokenKind::Yield => "yield",
            TokenKind::Ident(name) => return write!(f, "{}", name),
            TokenKind::Int(n) => return write!(f, "{}", n),
            TokenKind::Float(n) => return write!(f, "{:?}", n),
            TokenKind::Str(s) => return write!(f, "{}", s),
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::GreaterEq => ">=",
            TokenKind::LessEq => "<=",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Bang => "!",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
        };
        f.write_str(text)
    }
}

/// A lexical token together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, line: usize) -> Self {
        Self { kind, span, line }
    }
}

/// One dump line: `line:KIND text`, e.g. `3:ASSIGN devote`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Str(s) => write!(f, "{}:{} \"{}\"", self.line, self.kind.name(), s),
            kind => write!(f, "{}:{} {}", self.line, kind.name(), kind),
        }
    }
}

impl Token {
    pub fn to_json(&self) -> serde_json::Value {
        let value = match &self.kind {
            TokenKind::Int(n) => json!(n),
            TokenKind::Float(n) => json!(n),
            TokenKind::Str(s) | TokenKind::Ident(s) => json!(s),
            _ => serde_json::Value::Null,
        };
        json!({
            "line": self.line,
            "kind": self.kind.name(),
            "text": self.kind.to_string(),
            "value": value,
        })
    }
}

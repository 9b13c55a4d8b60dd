use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::{Token, TokenKind};
use chumsky::prelude::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    /// `3x`: a word that starts with digits.
    DigitLeadingIdentifier(String),
    /// A `"` with no closing quote before the end of the line.
    UnterminatedString(String),
    IllegalCharacter(char),
    /// Integer literal that does not fit in 64 bits.
    NumberOutOfRange(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub line: usize,
}

impl LexError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match &self.kind {
            LexErrorKind::DigitLeadingIdentifier(_) => ("E0001", "rename so it starts with a letter or `_`"),
            LexErrorKind::UnterminatedString(_) => ("E0002", "missing closing `\"`"),
            LexErrorKind::IllegalCharacter(_) => ("E0003", "skipped"),
            LexErrorKind::NumberOutOfRange(_) => ("E0004", "does not fit in a 64-bit integer"),
        };
        Diagnostic::error(self.to_string())
            .with_code(code)
            .with_label(Label::primary(self.span, label))
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::DigitLeadingIdentifier(text) => {
                write!(f, "identifier cannot start with a digit -> {}", text)
            }
            LexErrorKind::UnterminatedString(text) => write!(f, "unterminated string -> {}", text),
            LexErrorKind::IllegalCharacter(c) => write!(f, "illegal character: {}", c),
            LexErrorKind::NumberOutOfRange(text) => write!(f, "integer literal out of range -> {}", text),
        }
    }
}

impl std::error::Error for LexError {}

/// What one scanning step produced: a token, or a reported-and-skipped error.
#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Token(TokenKind),
    Error(LexErrorKind),
}

/// Output of [`tokenize`]: the tokens in source order plus every lexical
/// error met along the way. Iterating it again restarts from the first token.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Lexed {
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|token| token.kind.clone()).collect()
    }
}

impl IntoIterator for Lexed {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a Lexed {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

fn is_word_start(c: &char) -> bool {
    c.is_ascii_alphabetic() || *c == '_'
}

fn is_word_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_'
}

fn number_lexeme(text: &str) -> Lexeme {
    if text.contains('.') {
        match text.parse::<f64>() {
            Ok(value) => Lexeme::Token(TokenKind::Float(value)),
            Err(_) => Lexeme::Error(LexErrorKind::NumberOutOfRange(text.to_string())),
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => Lexeme::Token(TokenKind::Int(value)),
            Err(_) => Lexeme::Error(LexErrorKind::NumberOutOfRange(text.to_string())),
        }
    }
}

/// Alternatives are tried in order, so the error rules shadow the
/// token rules they overlap with.
fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<(Lexeme, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let digit_led_identifier = text::digits(10)
        .then(any().filter(is_word_start))
        .then(any().filter(is_word_char).repeated())
        .to_slice()
        .map(|s: &str| Lexeme::Error(LexErrorKind::DigitLeadingIdentifier(s.to_string())));

    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(number_lexeme);

    // Escapes stay verbatim: `\"` keeps its backslash in the literal.
    let string_body = none_of("\\\"\n")
        .ignored()
        .or(just('\\').then(none_of('\n')).ignored())
        .repeated();

    let string = just('"')
        .ignore_then(string_body.clone().to_slice())
        .then_ignore(just('"'))
        .map(|s: &str| Lexeme::Token(TokenKind::Str(s.to_string())));

    // Only reached when `string` failed, i.e. the line ended first.
    let unterminated = just('"')
        .then(string_body)
        .to_slice()
        .map(|s: &str| Lexeme::Error(LexErrorKind::UnterminatedString(s.to_string())));

    let word = text::ascii::ident().map(|s: &str| {
        Lexeme::Token(TokenKind::keyword(s).unwrap_or_else(|| TokenKind::Ident(s.to_string())))
    });

    let op_double = choice((
        just(">=").to(TokenKind::GreaterEq),
        just("<=").to(TokenKind::LessEq),
        just("==").to(TokenKind::Eq),
        just("!=").to(TokenKind::NotEq),
        just("&&").to(TokenKind::And),
        just("||").to(TokenKind::Or),
    ));

    let op_single = choice((
        just('>').to(TokenKind::Greater),
        just('<').to(TokenKind::Less),
        just('!').to(TokenKind::Bang),
        just('(').to(TokenKind::LParen),
        just(')').to(TokenKind::RParen),
        just('{').to(TokenKind::LBrace),
        just('}').to(TokenKind::RBrace),
        just(';').to(TokenKind::Semicolon),
        just(',').to(TokenKind::Comma),
    ));

    let op = op_double.or(op_single).map(Lexeme::Token);

    let illegal = any().map(|c| Lexeme::Error(LexErrorKind::IllegalCharacter(c)));

    let lexeme = choice((digit_led_identifier, number, string, unterminated, word, op, illegal));

    let comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();
    let trivia = choice((text::whitespace().at_least(1).ignored(), comment)).repeated();

    trivia
        .clone()
        .ignore_then(
            lexeme
                .map_with(|lexeme, e| (lexeme, e.span()))
                .then_ignore(trivia)
                .repeated()
                .collect(),
        )
        .then_ignore(end())
}

/// Byte offsets at which each line starts; line `n` (1-based) starts at `starts[n - 1]`.
fn line_starts(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn line_of(starts: &[usize], offset: usize) -> usize {
    starts.partition_point(|&start| start <= offset).max(1)
}

/// Scans `source` into tokens. Lexical errors never stop the scan; they are
/// collected next to the tokens and the offending text produces no token.
pub fn tokenize(source: &str) -> Lexed {
    let starts = line_starts(source);
    let (output, parse_errors) = lexer().parse(source).into_output_errors();

    let mut lexed = Lexed::default();
    for (lexeme, span) in output.unwrap_or_default() {
        let span = Span::new(span.start, span.end);
        let line = line_of(&starts, span.start);
        match lexeme {
            Lexeme::Token(kind) => lexed.tokens.push(Token::new(kind, span, line)),
            Lexeme::Error(kind) => lexed.errors.push(LexError { kind, span, line }),
        }
    }

    // The scanner has a catch-all alternative, so this only fires if the
    // grammar above is changed to something that can get stuck.
    for err in parse_errors {
        let span = Span::new(err.span().start, err.span().end);
        let offending = source[span.start..].chars().next().unwrap_or('\0');
        lexed.errors.push(LexError {
            kind: LexErrorKind::IllegalCharacter(offending),
            span,
            line: line_of(&starts, span.start),
        });
    }

    lexed
}

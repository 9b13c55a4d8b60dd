use super::stack::guarded;
use crate::ast::{BinaryOp, Block, FunctionDef, Node, UnaryOp};
use crate::diagnostic::{line_text, Diagnostic, Label, Span};
use crate::lexer::{tokenize, LexError};
use crate::token::{Token, TokenKind};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Deepest nesting of parentheses, prefixes, operator chains and blocks a
/// program may use.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: String,
        line: usize,
        source_line: String,
    },
    UnexpectedEof,
    DuplicateParameter {
        name: String,
        decree: String,
        line: usize,
    },
    TooDeep {
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub expected: Vec<String>,
}

impl ParseError {
    pub fn line(&self) -> Option<usize> {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { line, .. }
            | ParseErrorKind::DuplicateParameter { line, .. }
            | ParseErrorKind::TooDeep { line } => Some(*line),
            ParseErrorKind::UnexpectedEof => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let expected = if self.expected.is_empty() {
            String::new()
        } else {
            format!("expected {}", self.expected.join(" or "))
        };

        match &self.kind {
            ParseErrorKind::UnexpectedToken { found, .. } => {
                let diag = Diagnostic::error(format!("unexpected token `{}`", found))
                    .with_code("E0101")
                    .with_label(Label::primary(self.span, expected));
                if found == "decree" {
                    diag.with_help("decrees can only be declared at the top level of a program")
                } else {
                    diag
                }
            }
            ParseErrorKind::UnexpectedEof => Diagnostic::error("unexpected end of input")
                .with_code("E0102")
                .with_label(Label::primary(self.span, expected)),
            ParseErrorKind::DuplicateParameter { name, decree, .. } => {
                Diagnostic::error(format!("parameter `{}` is declared twice in decree `{}`", name, decree))
                    .with_code("E0103")
                    .with_label(Label::primary(self.span, "duplicate parameter"))
            }
            ParseErrorKind::TooDeep { .. } => Diagnostic::error("program is nested too deeply")
                .with_code("E0104")
                .with_label(Label::primary(
                    self.span,
                    format!("more than {} levels deep here", MAX_NESTING_DEPTH),
                ))
                .with_help("split the expression with intermediate variables"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken {
                found,
                line,
                source_line,
            } => write!(
                f,
                "syntax error on line {}, token '{}': -> {}",
                line,
                found,
                source_line.trim()
            ),
            ParseErrorKind::UnexpectedEof => write!(f, "syntax error at end of input"),
            ParseErrorKind::DuplicateParameter { name, decree, line } => write!(
                f,
                "syntax error on line {}: parameter '{}' is declared twice in decree '{}'",
                line, name, decree
            ),
            ParseErrorKind::TooDeep { line } => write!(
                f,
                "syntax error on line {}: nesting deeper than {} levels",
                line, MAX_NESTING_DEPTH
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Everything a parse produced. `program` is `None` exactly when `error` is set.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: Option<Block>,
    pub lex_errors: Vec<LexError>,
    pub error: Option<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Lexical errors first, then the syntax error if there was one.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lex_errors
            .iter()
            .map(LexError::to_diagnostic)
            .chain(self.error.iter().map(ParseError::to_diagnostic))
            .collect()
    }
}

/// Tokenizes and parses `source`. Lexical errors are collected and the
/// offending text skipped; the first syntax error stops the parse.
pub fn parse(source: &str) -> ParseResult {
    let lexed = tokenize(source);
    let mut parser = TokenParser::new(lexed.tokens, source);
    match parser.parse_program() {
        Ok(program) => ParseResult {
            program: Some(program),
            lex_errors: lexed.errors,
            error: None,
        },
        Err(err) => ParseResult {
            program: None,
            lex_errors: lexed.errors,
            error: Some(err),
        },
    }
}

/// Recursive-descent parser over a token vector.
///
/// Expression levels, loosest first: `unir`, `||`, `&&`, the relational and
/// equality operators (non-associative), `inherit`/`plunder`, `forge`/`cleave`,
/// `shatter`, then the prefixes. `!` reaches over a whole additive expression
/// while `menos` binds to a single operand.
///
/// `depth` counts open parentheses, prefixes, chained operators and blocks;
/// past [`MAX_NESTING_DEPTH`] the parse fails instead of exhausting the stack.
pub struct TokenParser<'src> {
    tokens: Vec<Token>,
    current: usize,
    source: &'src str,
    depth: usize,
}

impl<'src> TokenParser<'src> {
    pub fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            current: 0,
            source,
            depth: 0,
        }
    }

    fn current_token(&self) -> Option<&TokenKind> {
        self.tokens.get(self.current).map(|token| &token.kind)
    }

    fn peek_token(&self) -> Option<&TokenKind> {
        self.tokens.get(self.current + 1).map(|token| &token.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current_token().is_some_and(|current| current == kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    /// Error for the token under the cursor, or end of input if there is none.
    fn unexpected(&self, expected: &[&str]) -> ParseError {
        let expected = expected.iter().map(|e| e.to_string()).collect();
        match self.tokens.get(self.current) {
            Some(token) => ParseError {
                kind: ParseErrorKind::UnexpectedToken {
                    found: token.kind.to_string(),
                    line: token.line,
                    source_line: line_text(self.source, token.line).unwrap_or("").to_string(),
                },
                span: token.span,
                expected,
            },
            None => ParseError {
                kind: ParseErrorKind::UnexpectedEof,
                span: Span::new(self.source.len(), self.source.len()),
                expected,
            },
        }
    }

    fn too_deep(&self) -> ParseError {
        let (line, span) = match self.tokens.get(self.current).or(self.tokens.last()) {
            Some(token) => (token.line, token.span),
            None => (1, Span::new(self.source.len(), self.source.len())),
        };
        ParseError {
            kind: ParseErrorKind::TooDeep { line },
            span,
            expected: Vec::new(),
        }
    }

    /// Takes one more level of nesting, failing once the limit is reached.
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` one level deeper.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        let base = self.depth;
        self.descend()?;
        let result = guarded(|| parse(self));
        self.depth = base;
        result
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        if self.check(&expected) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(&[format!("`{}`", expected).as_str()]))
    }

    fn expect_ident(&mut self) -> Result<(Rc<str>, Token), ParseError> {
        match self.current_token() {
            Some(TokenKind::Ident(name)) => {
                let name = Rc::from(name.as_str());
                let token = self.advance().ok_or_else(|| self.unexpected(&["identifier"]))?;
                Ok((name, token))
            }
            _ => Err(self.unexpected(&["identifier"])),
        }
    }

    pub fn parse_program(&mut self) -> Result<Block, ParseError> {
        let mut statements = Vec::new();
        while self.current_token().is_some() {
            if self.check(&TokenKind::Decree) {
                statements.push(self.parse_decree()?);
            } else {
                statements.push(self.parse_statement()?);
            }
        }
        Ok(Block::new(statements))
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.current_token() {
            Some(TokenKind::Ident(_)) if self.peek_token() == Some(&TokenKind::Devote) => {
                let assignment = self.parse_assignment()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(assignment)
            }
            Some(TokenKind::Judge) => self.parse_if(),
            Some(TokenKind::Vigil) => self.parse_while(),
            Some(TokenKind::March) => self.parse_for(),
            Some(TokenKind::Print) => self.parse_print(),
            Some(TokenKind::Yield) => self.parse_yield(),
            Some(TokenKind::Decree) => Err(self.unexpected(&["statement"])),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(expr)
            }
        }
    }

    fn parse_decree(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Decree)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;

        let mut params: Vec<Rc<str>> = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (param, token) = self.expect_ident()?;
                if params.contains(&param) {
                    return Err(ParseError {
                        kind: ParseErrorKind::DuplicateParameter {
                            name: param.to_string(),
                            decree: name.to_string(),
                            line: token.line,
                        },
                        span: token.span,
                        expected: Vec::new(),
                    });
                }
                params.push(param);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(Node::FunctionDef(Rc::new(FunctionDef { name, params, body })))
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.current_token().is_none() {
                return Err(self.unexpected(&["`}`"]));
            }
            statements.push(self.nested(Self::parse_statement)?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(statements))
    }

    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Devote)?;
        let value = self.parse_expression()?;
        Ok(Node::Assignment {
            name,
            value: Box::new(value),
        })
    }

    fn parse_condition(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Judge)?;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.check(&TokenKind::Exile) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Node::If {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Vigil)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Node::While {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_for(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::March)?;
        self.expect(TokenKind::LParen)?;
        let init = self.parse_assignment()?;
        self.expect(TokenKind::Semicolon)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        let update = self.parse_assignment()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Node::For {
            init: Box::new(init),
            condition: Box::new(condition),
            update: Box::new(update),
            body,
        })
    }

    fn parse_print(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::LParen)?;
        let mut args = vec![self.parse_expression()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            args.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Node::Print(args))
    }

    fn parse_yield(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Yield)?;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Node::Return(value))
    }

    pub fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.parse_concat()
    }

    /// One left-associative level: operands from `next`, operators from `op_of`.
    /// Each operator in the chain adds a level to the tree, so it counts
    /// toward the nesting limit until the chain ends.
    fn parse_left_assoc(
        &mut self,
        next: fn(&mut Self) -> Result<Node, ParseError>,
        op_of: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> Result<Node, ParseError> {
        let base = self.depth;
        let result = self.fold_left_assoc(next, op_of);
        self.depth = base;
        result
    }

    fn fold_left_assoc(
        &mut self,
        next: fn(&mut Self) -> Result<Node, ParseError>,
        op_of: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> Result<Node, ParseError> {
        let mut left = next(self)?;
        while let Some(op) = self.current_token().and_then(op_of) {
            self.advance();
            self.descend()?;
            let right = next(self)?;
            left = Node::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_concat(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(Self::parse_or, |kind| match kind {
            TokenKind::Unir => Some(BinaryOp::Concat),
            _ => None,
        })
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(Self::parse_and, |kind| match kind {
            TokenKind::Or => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(Self::parse_relational, |kind| match kind {
            TokenKind::And => Some(BinaryOp::And),
            _ => None,
        })
    }

    fn relational_op(kind: &TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Greater => Some(BinaryOp::Greater),
            TokenKind::Less => Some(BinaryOp::Less),
            TokenKind::GreaterEq => Some(BinaryOp::GreaterEq),
            TokenKind::LessEq => Some(BinaryOp::LessEq),
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            _ => None,
        }
    }

    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_additive()?;
        let Some(op) = self.current_token().and_then(Self::relational_op) else {
            return Ok(left);
        };
        self.advance();
        let right = self.parse_additive()?;
        // `a < b < c` has no meaning; the second operator is the error.
        if self.current_token().and_then(Self::relational_op).is_some() {
            return Err(self.unexpected(&["`&&`", "`||`", "`;`", "`)`"]));
        }
        Ok(Node::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(Self::parse_multiplicative, |kind| match kind {
            TokenKind::Inherit => Some(BinaryOp::Add),
            TokenKind::Plunder => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(Self::parse_modulo, |kind| match kind {
            TokenKind::Forge => Some(BinaryOp::Mul),
            TokenKind::Cleave => Some(BinaryOp::Div),
            _ => None,
        })
    }

    fn parse_modulo(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(Self::parse_prefix, |kind| match kind {
            TokenKind::Shatter => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    fn parse_prefix(&mut self) -> Result<Node, ParseError> {
        match self.current_token() {
            Some(TokenKind::Bang) => {
                self.advance();
                let operand = self.nested(Self::parse_additive)?;
                Ok(Node::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                })
            }
            Some(TokenKind::Menos) => {
                self.advance();
                let operand = self.nested(Self::parse_prefix)?;
                Ok(Node::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.nested(Self::parse_expression)?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                args.push(self.nested(Self::parse_expression)?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let Some(kind) = self.current_token().cloned() else {
            return Err(self.unexpected(&["expression"]));
        };

        match kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Node::Literal(Value::Int(n)))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Node::Literal(Value::Float(n)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Node::Literal(Value::string(s)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.nested(Self::parse_expression)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                self.advance();
                let name: Rc<str> = Rc::from(name.as_str());
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    Ok(Node::Call { name, args })
                } else {
                    Ok(Node::Identifier(name))
                }
            }
            TokenKind::Parias => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let (name, _) = self.expect_ident()?;
                self.expect(TokenKind::RParen)?;
                Ok(Node::Parias { name })
            }
            TokenKind::Inquire => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let prompt = self.nested(Self::parse_expression)?;
                self.expect(TokenKind::RParen)?;
                Ok(Node::Inquire {
                    prompt: Box::new(prompt),
                })
            }
            TokenKind::Conquistar => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let town = self.nested(Self::parse_expression)?;
                self.expect(TokenKind::Comma)?;
                let army = self.nested(Self::parse_expression)?;
                self.expect(TokenKind::Comma)?;
                let defense = self.nested(Self::parse_expression)?;
                self.expect(TokenKind::RParen)?;
                Ok(Node::Conquistar {
                    town: Box::new(town),
                    army: Box::new(army),
                    defense: Box::new(defense),
                })
            }
            _ => Err(self.unexpected(&["expression"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(source: &str) -> Block {
        let result = parse(source);
        assert!(result.is_ok(), "parse failed: {:?}", result.error);
        result.program.unwrap()
    }

    fn expr(source: &str) -> Node {
        let mut block = program(&format!("{};", source));
        assert_eq!(block.statements.len(), 1);
        block.statements.remove(0)
    }

    fn ident(name: &str) -> Box<Node> {
        Box::new(Node::Identifier(Rc::from(name)))
    }

    fn binary(left: Box<Node>, op: BinaryOp, right: Box<Node>) -> Box<Node> {
        Box::new(Node::Binary { left, op, right })
    }

    fn failure(source: &str) -> ParseError {
        let result = parse(source);
        assert!(result.program.is_none());
        result.error.expect("expected a syntax error")
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let expected = binary(ident("a"), BinaryOp::Add, binary(ident("b"), BinaryOp::Mul, ident("c")));
        assert_eq!(expr("a inherit b forge c"), *expected);
    }

    #[test]
    fn test_modulo_binds_tighter_than_multiplication() {
        let expected = binary(ident("a"), BinaryOp::Mul, binary(ident("b"), BinaryOp::Mod, ident("c")));
        assert_eq!(expr("a forge b shatter c"), *expected);
    }

    #[test]
    fn test_left_associativity() {
        let expected = binary(binary(ident("a"), BinaryOp::Sub, ident("b")), BinaryOp::Sub, ident("c"));
        assert_eq!(expr("a plunder b plunder c"), *expected);
    }

    #[test]
    fn test_concat_is_loosest() {
        let expected = binary(ident("a"), BinaryOp::Concat, binary(ident("b"), BinaryOp::Or, ident("c")));
        assert_eq!(expr("a unir b || c"), *expected);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expected = binary(ident("a"), BinaryOp::Or, binary(ident("b"), BinaryOp::And, ident("c")));
        assert_eq!(expr("a || b && c"), *expected);
    }

    #[test]
    fn test_not_covers_additive_but_not_relational() {
        let not_sum = Box::new(Node::Unary {
            op: UnaryOp::Not,
            operand: binary(ident("a"), BinaryOp::Add, ident("b")),
        });
        assert_eq!(expr("!a inherit b"), *not_sum);

        let not_a = Box::new(Node::Unary {
            op: UnaryOp::Not,
            operand: ident("a"),
        });
        assert_eq!(expr("!a > b"), *binary(not_a, BinaryOp::Greater, ident("b")));
    }

    #[test]
    fn test_menos_binds_to_one_operand() {
        let neg_a = Box::new(Node::Unary {
            op: UnaryOp::Neg,
            operand: ident("a"),
        });
        assert_eq!(expr("menos a forge b"), *binary(neg_a, BinaryOp::Mul, ident("b")));
    }

    #[test]
    fn test_relational_is_non_associative() {
        let err = failure("x devote a < b < c;");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { ref found, .. } if found == "<"));
    }

    #[test]
    fn test_statements() {
        let block = program(
            "x devote 1;\n\
             judge (x > 0) { print(\"pos\"); } exile { print(\"neg\", x); }\n\
             vigil (x < 3) { x devote x inherit 1; }\n\
             march (i devote 0; i < 2; i devote i inherit 1) { f(i); }",
        );
        assert_eq!(block.statements.len(), 4);
        assert!(matches!(block.statements[0], Node::Assignment { .. }));
        assert!(matches!(block.statements[1], Node::If { else_branch: Some(_), .. }));
        assert!(matches!(block.statements[2], Node::While { .. }));
        assert!(matches!(block.statements[3], Node::For { .. }));
    }

    #[test]
    fn test_decree_and_yield() {
        let block = program("decree add(a, b) { yield a inherit b; } decree nop() { yield; }");
        match &block.statements[0] {
            Node::FunctionDef(def) => {
                assert_eq!(def.name.as_ref(), "add");
                assert_eq!(def.params.len(), 2);
                assert!(matches!(def.body.statements[0], Node::Return(Some(_))));
            }
            other => panic!("expected a decree, got {:?}", other),
        }
        match &block.statements[1] {
            Node::FunctionDef(def) => assert!(matches!(def.body.statements[0], Node::Return(None))),
            other => panic!("expected a decree, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_forms() {
        assert!(matches!(expr("parias(gold)"), Node::Parias { .. }));
        assert!(matches!(expr("inquire(\"? \")"), Node::Inquire { .. }));
        assert!(matches!(expr("conquistar(\"Cusco\", army, 10)"), Node::Conquistar { .. }));
        assert!(matches!(expr("f()"), Node::Call { ref args, .. } if args.is_empty()));
    }

    #[test]
    fn test_parias_needs_identifier() {
        assert!(matches!(failure("parias(5);").kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_error_names_line_and_text() {
        let err = failure("x devote 1;\ny devote ;\n");
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.to_string(), "syntax error on line 2, token ';': -> y devote ;");
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = failure("decree f() { print(1);");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.to_string(), "syntax error at end of input");
    }

    #[test]
    fn test_nested_decree_rejected() {
        let err = failure("judge (1) { decree f() { } }");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { ref found, .. } if found == "decree"));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = failure("decree f(a, a) { }");
        assert!(matches!(err.kind, ParseErrorKind::DuplicateParameter { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_print_requires_an_argument() {
        failure("print();");
    }

    #[test]
    fn test_lex_errors_do_not_stop_parsing() {
        let result = parse("x devote 1 @;");
        assert!(result.is_ok());
        assert_eq!(result.lex_errors.len(), 1);
        assert_eq!(result.diagnostics().len(), 1);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("x devote {}1{};", "(".repeat(3000), ")".repeat(3000));
        let err = failure(&deep);
        assert_eq!(err.kind, ParseErrorKind::TooDeep { line: 1 });
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("E0104"));

        let shallow = format!("x devote {}1{};", "(".repeat(100), ")".repeat(100));
        assert_eq!(program(&shallow).statements.len(), 1);
    }

    #[test]
    fn test_long_prefix_and_operator_chains_are_bounded() {
        let negations = format!("print({}1);", "menos ".repeat(50_000));
        assert!(matches!(failure(&negations).kind, ParseErrorKind::TooDeep { .. }));

        let sum = format!("print(1{});", " inherit 1".repeat(5_000));
        assert!(matches!(failure(&sum).kind, ParseErrorKind::TooDeep { .. }));

        let nested_blocks = format!("{}print(1);{}", "judge (1) { ".repeat(400), "}".repeat(400));
        assert!(matches!(failure(&nested_blocks).kind, ParseErrorKind::TooDeep { .. }));
    }

    #[test]
    fn test_empty_program() {
        assert!(program("").is_empty());
        assert!(program("// only a comment\n").is_empty());
    }
}

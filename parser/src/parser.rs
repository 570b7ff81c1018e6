//! Recursive-descent parser for `not(<predicate> [& <predicate>]*)`.

use crate::lexer::{Lexer, Token, TokenKind};
use crate::{
    ConstraintSet, DenialConstraint, Operand, Operator, ParseError, ParseErrors, ParseResult,
    Predicate, Span, TupleVar,
};
use dcim_core::canonical_name;

/// Parser over the tokens of one constraint line.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Tokenize a line; spans report `line`.
    pub fn new(input: &str, line: usize) -> ParseResult<Self> {
        let tokens = Lexer::new(input, line).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof and we never advance past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        let token = self.advance();
        if token.kind == kind {
            return Ok(token);
        }
        Err(unexpected(&token, what))
    }

    /// Parse a full constraint and require end of input.
    pub fn parse_constraint(&mut self) -> ParseResult<DenialConstraint> {
        let keyword = self.advance();
        match &keyword.kind {
            TokenKind::Name(n) if n.eq_ignore_ascii_case("not") => {}
            _ => return Err(unexpected(&keyword, "'not'")),
        }
        self.expect(TokenKind::LParen, "'('")?;

        let mut predicates = vec![self.parse_predicate()?];
        while self.peek().kind == TokenKind::Amp {
            self.advance();
            predicates.push(self.parse_predicate()?);
        }

        self.expect(TokenKind::RParen, "')' or '&'")?;
        self.expect(TokenKind::Eof, "end of constraint")?;

        Ok(DenialConstraint {
            predicates,
            line: keyword.span.line,
        })
    }

    fn parse_predicate(&mut self) -> ParseResult<Predicate> {
        let start = self.peek().span;
        let left = self.parse_operand()?;
        let op = self.parse_operator()?;
        let right = self.parse_operand()?;
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Ok(Predicate {
            left,
            op,
            right,
            span: Span::new(start.start, end.end, start.line, start.column),
        })
    }

    fn parse_operator(&mut self) -> ParseResult<Operator> {
        let token = self.advance();
        match token.kind {
            TokenKind::Op(op) => Ok(op),
            _ => Err(unexpected(&token, "comparison operator")),
        }
    }

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let token = self.advance();
        let TokenKind::Name(text) = &token.kind else {
            return Err(unexpected(&token, "tuple-qualified attribute"));
        };
        let Some((var, attr)) = text.split_once('.') else {
            return Err(ParseError::malformed_operand(token.span, text));
        };
        let var = match var.to_ascii_lowercase().as_str() {
            "t1" => TupleVar::T1,
            "t2" => TupleVar::T2,
            _ => return Err(ParseError::malformed_operand(token.span, text)),
        };
        let attr = canonical_name(attr);
        if attr.is_empty() {
            return Err(ParseError::malformed_operand(token.span, text));
        }
        Ok(Operand::new(var, attr))
    }
}

fn unexpected(token: &Token, expected: &str) -> ParseError {
    match token.kind {
        TokenKind::Eof => ParseError::unexpected_eof(token.span, expected),
        _ => ParseError::unexpected_token(token.span, expected, &token.kind.name()),
    }
}

/// Parse a single constraint line.
pub fn parse_constraint(input: &str) -> ParseResult<DenialConstraint> {
    Parser::new(input.trim(), 1)?.parse_constraint()
}

/// Outcome of parsing a whole constraint file: every line that parsed, plus
/// every error. A bad line never stops the lines after it.
#[derive(Debug, Clone, Default)]
pub struct ParsedConstraints {
    pub constraints: ConstraintSet,
    pub errors: ParseErrors,
}

impl ParsedConstraints {
    /// All-or-nothing view of the batch.
    pub fn into_result(self) -> Result<ConstraintSet, ParseErrors> {
        if self.errors.is_empty() {
            Ok(self.constraints)
        } else {
            Err(self.errors)
        }
    }
}

/// Parse a constraint file: one constraint per line; blank lines and lines
/// starting with `#` are skipped.
pub fn parse_constraints(source: &str) -> ParsedConstraints {
    let mut constraints = Vec::new();
    let mut errors = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Parser::new(line, index + 1).and_then(|mut p| p.parse_constraint()) {
            Ok(constraint) => constraints.push(constraint),
            Err(error) => errors.push(error),
        }
    }

    ParsedConstraints {
        constraints: ConstraintSet::new(constraints),
        errors: ParseErrors(errors),
    }
}

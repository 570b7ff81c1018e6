//! Lexer (tokenizer) for denial-constraint text.

use crate::{Operator, ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare word: the `not` keyword or a tuple-qualified attribute.
    /// Whitespace inside a qualified attribute name is folded to `_`.
    Name(String),
    Op(Operator),
    LParen, // (
    RParen, // )
    Amp,    // &
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> String {
        match self {
            TokenKind::Name(n) => format!("'{}'", n),
            TokenKind::Op(op) => format!("'{}'", op),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Amp => "'&'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

fn is_op_char(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !is_op_char(c) && !matches!(c, '(' | ')' | '&')
}

/// Lexer state over a single constraint line.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer whose spans report the given 1-based line.
    pub fn new(input: &'a str, line: usize) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
            line,
            column: 1,
        }
    }

    /// Tokenize all input into a vector of tokens.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn span_from(&self, start: usize, start_col: usize) -> Span {
        Span::new(start, self.pos, self.line, start_col)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next_char(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.pos = pos + c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.next_char();
        }
    }

    /// First non-whitespace character ahead, without consuming anything.
    fn peek_past_whitespace(&self) -> Option<char> {
        self.chars
            .clone()
            .map(|(_, c)| c)
            .find(|c| !c.is_whitespace())
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let start_col = self.column;

        let Some(c) = self.next_char() else {
            return Ok(Token::new(TokenKind::Eof, self.span_from(start, start_col)));
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '&' => TokenKind::Amp,
            c if is_op_char(c) => self.scan_operator(c, start, start_col)?,
            c => self.scan_name(c),
        };

        Ok(Token::new(kind, self.span_from(start, start_col)))
    }

    fn scan_operator(&mut self, first: char, start: usize, start_col: usize) -> ParseResult<TokenKind> {
        let mut text = String::from(first);
        while let Some(c) = self.peek_char() {
            if !is_op_char(c) {
                break;
            }
            text.push(c);
            self.next_char();
        }
        let op = match text.as_str() {
            "=" => Operator::Eq,
            "!=" => Operator::Ne,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Le,
            ">=" => Operator::Ge,
            other => return Err(ParseError::unknown_operator(self.span_from(start, start_col), other)),
        };
        Ok(TokenKind::Op(op))
    }

    fn scan_name(&mut self, first: char) -> TokenKind {
        let mut name = String::from(first);
        loop {
            match self.peek_char() {
                Some(c) if is_name_char(c) => {
                    name.push(c);
                    self.next_char();
                }
                // A qualified attribute may continue after a space ("t1.Zip Code").
                Some(c) if c.is_whitespace() && name.contains('.') => {
                    match self.peek_past_whitespace() {
                        Some(next) if is_name_char(next) => {
                            self.skip_whitespace();
                            name.push('_');
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        TokenKind::Name(name)
    }
}

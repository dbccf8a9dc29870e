//! Lexer (tokenizer) for equation text.

use crate::{ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Ident(String),
    Number(f64),

    // Symbols
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    LParen, // (
    RParen, // )
    Eq,     // =

    // End of input
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Eq => "=",
            TokenKind::Eof => "end of input",
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

/// Lexer state.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
}

fn is_ident_head(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_tail(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
        }
    }

    /// Tokenize all input into a vector of tokens.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(c) = self.next_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(self.pos, self.pos)));
        };

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => TokenKind::Eq,
            '0'..='9' => self.scan_number(c, start)?,
            c if is_ident_head(c) => self.scan_ident(c),
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", c),
                    Span::new(start, self.pos),
                ));
            }
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn scan_ident(&mut self, first: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first);

        while let Some(c) = self.peek_char() {
            if is_ident_tail(c) {
                ident.push(c);
                self.next_char();
            } else {
                break;
            }
        }

        TokenKind::Ident(ident)
    }

    fn scan_number(&mut self, first: char, start: usize) -> ParseResult<TokenKind> {
        let mut text = String::new();
        text.push(first);

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                text.push(c);
                self.next_char();
            } else {
                break;
            }
        }

        // Optional fraction
        if self.peek_char() == Some('.') {
            text.push('.');
            self.next_char();
            let mut saw_digit = false;
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.next_char();
                    saw_digit = true;
                } else {
                    break;
                }
            }
            if !saw_digit {
                return Err(ParseError::new(
                    "expected digits after decimal point",
                    Span::new(start, self.pos),
                ));
            }
        }

        match text.parse::<f64>() {
            Ok(n) => Ok(TokenKind::Number(n)),
            Err(_) => Err(ParseError::new(
                format!("invalid number literal '{}'", text),
                Span::new(start, self.pos),
            )),
        }
    }
}

//! Recursive-descent parser for equation text.
//!
//! Grammar:
//! ```text
//! equation := expr '=' expr
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary)*
//! unary    := '-' unary | primary
//! primary  := number | identifier | '(' expr ')'
//! ```

use crate::ast::{BinOp, Equation, Expr};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Parse a single-line equation.
pub fn parse(input: &str) -> ParseResult<Equation> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };

    let lhs = parser.parse_expr()?;
    parser.expect(&TokenKind::Eq)?;
    let rhs = parser.parse_expr()?;
    parser.expect(&TokenKind::Eof)?;

    Ok(Equation { lhs, rhs })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token stream always ends with Eof, which is never consumed.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::unexpected_token(
                token.span,
                kind.name(),
                token.kind.name(),
            ))
        }
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = if self.check(&TokenKind::Plus) {
                BinOp::Add
            } else if self.check(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };

            self.advance();
            let right = self.parse_term()?;
            left = Expr::bin(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = if self.check(&TokenKind::Star) {
                BinOp::Mul
            } else if self.check(&TokenKind::Slash) {
                BinOp::Div
            } else {
                break;
            };

            self.advance();
            let right = self.parse_unary()?;
            left = Expr::bin(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Minus) {
            self.advance();
            let inner = self.parse_unary()?;
            Ok(Expr::neg(inner))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        match &token.kind {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Num(n))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::Var(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(ParseError::unexpected_token(
                token.span,
                "expression",
                token.kind.name(),
            )),
        }
    }
}

//! Expression parsing implementation
//!
//! This module handles parsing of Lup expressions using precedence climbing
//! for binary operators and recursive descent for primary values.
//!
//! # Supported Expressions
//!
//! - Literals: numbers (decimal, `0x` hex, `0b` binary), strings, booleans, `null`
//! - Variables and named calls `f(a, b)`
//! - Array literals `[a, b, c]`
//! - Anonymous functions, optionally invoked: `fn (x) { ... }(1)`
//! - Prefix operators: `-`, `!`, `~`, `...`
//! - Binary operators from every band of the operator table
//! - Parenthesized sub-expressions
//!
//! # Precedence
//!
//! `parse_expression(min)` parses one operand, then keeps absorbing operators
//! whose precedence is at least `min`, parsing each right-hand side with a
//! threshold one above the operator's own level. That makes every band left
//! associative. A `BinaryOp` is positioned at the first token of its left
//! operand.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::parser::ast::*;
use crate::parser::operators::{self, Precedence};
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// Parse an expression whose operators all bind at `min_precedence` or
    /// tighter
    pub(crate) fn parse_expression(&mut self, min_precedence: u8) -> CompileResult<Expression> {
        self.enter_nesting()?;
        let expression = self.climb(min_precedence);
        self.leave_nesting();
        expression
    }

    fn climb(&mut self, min_precedence: u8) -> CompileResult<Expression> {
        let loc = self.current_position();

        let mut left = if self.match_token(TokenKind::Grouping, "(") {
            let inner = self.parse_expression(0)?;
            if !self.match_token(TokenKind::Grouping, ")") {
                return Err(CompilerError::new(
                    ErrorKind::MissingCloseParenthesis,
                    self.current_position(),
                ));
            }
            inner
        } else {
            self.parse_value()?
        };

        loop {
            let token = self.current();
            // `->` belongs to `for` and ends the iterable expression
            if token.kind != TokenKind::Operator || token.lexeme == operators::FOR_ARROW {
                break;
            }

            let precedence = operators::precedence(&token.lexeme, token.position)?;
            if precedence < min_precedence {
                break;
            }

            let op = self.advance().lexeme.clone();
            let right = self.parse_expression(precedence + 1)?;

            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position: loc,
            };
        }

        Ok(left)
    }

    /// Parse a primary value or a prefix operator application
    pub(crate) fn parse_value(&mut self) -> CompileResult<Expression> {
        let loc = self.current_position();
        let token = self.current().clone();

        match token.kind {
            TokenKind::Eof => Err(CompilerError::new(ErrorKind::UnexpectedEof, loc)),

            TokenKind::Number => {
                let value = parse_number(&token.lexeme, loc)?;
                self.advance();
                Ok(Value::Number {
                    value,
                    position: loc,
                }
                .into())
            }

            TokenKind::Quote => {
                self.advance();
                if !self.check_kind(TokenKind::String) {
                    return Err(self.internal_error("expected string body after quote"));
                }
                let value = self.advance().lexeme.clone();
                if !self.check_kind(TokenKind::Quote) {
                    return Err(self.internal_error("expected closing quote after string body"));
                }
                self.advance();
                Ok(Value::String {
                    value,
                    position: loc,
                }
                .into())
            }

            TokenKind::Boolean => {
                self.advance();
                Ok(Value::Boolean {
                    value: token.lexeme == "true",
                    position: loc,
                }
                .into())
            }

            TokenKind::Null => {
                self.advance();
                Ok(Value::Null { position: loc }.into())
            }

            TokenKind::Identifier => {
                if self.peek()?.is(TokenKind::Grouping, "(") {
                    let call = self.parse_named_call()?;
                    return Ok(Expression::Declaration(Declaration::NamedFuncCall(call)));
                }
                self.advance();
                Ok(Value::Variable(Variable::new(token.lexeme, loc)).into())
            }

            TokenKind::Grouping if token.lexeme == "[" => self.parse_array_literal(),

            TokenKind::Keyword if token.lexeme == "fn" => {
                Ok(Expression::Declaration(self.parse_anon_function()?))
            }

            TokenKind::Operator if operators::is_prefix(&token.lexeme) => {
                self.advance();
                let operand = self.parse_expression(Precedence::Unary.level())?;
                Ok(Expression::PrefixOp {
                    op: token.lexeme,
                    operand: Box::new(operand),
                    position: loc,
                })
            }

            _ => Err(CompilerError::unexpected_token("value", &token, loc)),
        }
    }

    /// `[a, b, c]`; a trailing comma is allowed
    fn parse_array_literal(&mut self) -> CompileResult<Expression> {
        let loc = self.current_position();
        self.advance(); // consume '['

        let mut values = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::Grouping, "]") {
            values.push(self.parse_expression(0)?);

            if !self.match_token(TokenKind::Punctuation, ",") {
                break;
            }
        }

        if !self.match_token(TokenKind::Grouping, "]") {
            return Err(CompilerError::new(
                ErrorKind::UnterminatedArrayLiteral,
                self.current_position(),
            ));
        }

        Ok(Value::Array {
            values,
            position: loc,
        }
        .into())
    }
}

/// Convert number literal text to its value. Underscores are separators;
/// `0x` and `0b` select the radix.
fn parse_number(lexeme: &str, position: Position) -> CompileResult<f64> {
    let digits: String = lexeme.chars().filter(|&c| c != '_').collect();
    let invalid = || {
        CompilerError::new(
            ErrorKind::InternalParser(format!("Invalid number literal '{}'", lexeme)),
            position,
        )
    };

    let radix_digits = if let Some(hex) = digits.strip_prefix("0x") {
        Some((hex, 16))
    } else {
        digits.strip_prefix("0b").map(|bin| (bin, 2))
    };

    match radix_digits {
        Some((body, radix)) if !body.is_empty() => body
            .chars()
            .try_fold(0.0_f64, |acc, c| {
                c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
            })
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
        None => digits.parse::<f64>().map_err(|_| invalid()),
    }
}

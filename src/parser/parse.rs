//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its cursor helpers and the
//! program/block entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: statement dispatch (`let`, `const`, `if`, loops, ...)
//! - `declarations`: functions, parameter lists and argument lists
//! - `expressions`: precedence climbing and primary values
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Parsing is fail-fast: the first structural problem is returned as a
//! [`CompilerError`] and nothing is recovered.

use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::observer::Observer;
use crate::parser::ast::*;
use crate::parser::lexer::Lexer;
use crate::parser::token::{Token, TokenKind};
use tracing::debug;

/// How many blocks and sub-expressions may be open at once. Deeper input is
/// rejected before it can exhaust the stack of the parser, the checker or the
/// AST's drop glue.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recursive descent parser for Lup
pub struct Parser<'o> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    depth: usize,
    observer: Option<&'o mut dyn Observer>,
}

impl<'o> Parser<'o> {
    /// Create a parser over a token stream. A missing trailing EOF token is
    /// supplied.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map(|t| t.position).unwrap_or_default();
            tokens.push(Token::eof(end));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
            observer: None,
        }
    }

    /// Create a parser that reports each finished statement to `observer`
    pub fn with_observer(tokens: Vec<Token>, observer: &'o mut dyn Observer) -> Self {
        Self {
            observer: Some(observer),
            ..Self::new(tokens)
        }
    }

    /// Lex `source` and create a parser over the result
    pub fn from_source(source: &str) -> CompileResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new(tokens))
    }

    /// Parse the whole token stream. Unlike [`Parser::parse_program`], a
    /// stray `}` at the top level is an error.
    pub fn parse(&mut self) -> CompileResult<Program> {
        let program = self.parse_program()?;

        if !self.is_at_end() {
            return Err(CompilerError::unexpected_token(
                "EOF",
                self.current(),
                self.current_position(),
            ));
        }

        debug!(statements = program.len(), "parsed program");
        Ok(program)
    }

    /// Parse statements until EOF or a closing `}`. The `}` is not consumed.
    pub fn parse_program(&mut self) -> CompileResult<Program> {
        let mut program = Program::new(self.current_position());

        while !self.is_at_end() && !self.check(TokenKind::Grouping, "}") {
            let statement = self.parse_statement()?;
            if let Some(observer) = self.observer.as_deref_mut() {
                observer.statement(&statement);
            }
            program.statements.push(statement);
        }

        Ok(program)
    }

    /// Parse `{ statements }`. The returned program is positioned at the `{`.
    pub fn parse_block(&mut self) -> CompileResult<Program> {
        self.enter_nesting()?;
        let body = self.parse_braced();
        self.leave_nesting();
        body
    }

    fn parse_braced(&mut self) -> CompileResult<Program> {
        let loc = self.current_position();
        if !self.match_token(TokenKind::Grouping, "{") {
            return Err(CompilerError::new(ErrorKind::MissingOpenBrace, loc));
        }

        let mut body = self.parse_program()?;
        body.position = loc;

        if !self.match_token(TokenKind::Grouping, "}") {
            return Err(CompilerError::new(
                ErrorKind::MissingCloseBrace,
                self.current_position(),
            ));
        }

        Ok(body)
    }

    // ===== Helper methods =====

    /// Open one nesting level, failing at the current token once
    /// [`MAX_NESTING_DEPTH`] levels are already open. Every successful call
    /// must be paired with [`Parser::leave_nesting`].
    pub(crate) fn enter_nesting(&mut self) -> CompileResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CompilerError::new(
                ErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                self.current_position(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// The token under the cursor. Reading EOF is always allowed.
    pub(crate) fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    /// The token after the cursor. Looking past EOF is an error.
    pub(crate) fn peek(&self) -> CompileResult<&Token> {
        if self.is_at_end() {
            return Err(CompilerError::new(
                ErrorKind::UnexpectedEof,
                self.current_position(),
            ));
        }
        self.tokens
            .get(self.position + 1)
            .ok_or_else(|| CompilerError::new(ErrorKind::UnexpectedEof, self.current_position()))
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    pub(crate) fn check(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.current().is(kind, lexeme)
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn check_keyword(&self, keyword: &str) -> bool {
        self.check(TokenKind::Keyword, keyword)
    }

    /// Consume the current token if it matches
    pub(crate) fn match_token(&mut self, kind: TokenKind, lexeme: &str) -> bool {
        if self.check(kind, lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn current_position(&self) -> Position {
        self.current().position
    }

    pub(crate) fn expect_semicolon(&mut self) -> CompileResult<()> {
        if self.match_token(TokenKind::Punctuation, ";") {
            Ok(())
        } else {
            Err(CompilerError::new(
                ErrorKind::MissingSemicolon,
                self.current_position(),
            ))
        }
    }

    /// Consume an identifier and turn it into a [`Variable`], or fail with
    /// `kind` at the current token
    pub(crate) fn expect_variable(&mut self, kind: ErrorKind) -> CompileResult<Variable> {
        if !self.check_kind(TokenKind::Identifier) {
            return Err(CompilerError::new(kind, self.current_position()));
        }
        let token = self.advance();
        Ok(Variable::new(token.lexeme.clone(), token.position))
    }

    pub(crate) fn internal_error(&self, message: &str) -> CompilerError {
        CompilerError::new(
            ErrorKind::InternalParser(message.to_string()),
            self.current_position(),
        )
    }
}

/// Lex and parse `source` in one step
pub fn parse_source(source: &str) -> CompileResult<Program> {
    Parser::from_source(source)?.parse()
}

//! Function declaration and call parsing
//!
//! This module handles the function forms of Lup:
//!
//! - Named declarations: `fn name(params) { ... }`
//! - Anonymous functions: `fn (params) { ... }`, optionally invoked on the spot
//!   with an argument list
//! - Named calls: `name(args)`
//! - Parameter lists (with `name = default` parameters) and argument lists
//!
//! # Grammar
//!
//! ```text
//! fn_stmt    ::= "fn" identifier params block
//!              | "fn" params block args [";"]
//! anon_fn    ::= "fn" params block [args]
//! named_call ::= identifier args
//! params     ::= "(" [param ("," param)* [","]] ")"
//! param      ::= identifier ["=" expression]
//! args       ::= "(" [expression ("," expression)* [","]] ")"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::parser::ast::*;
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// `fn` in statement position: a named declaration, or an anonymous
    /// function that is called immediately
    pub(crate) fn parse_fn_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();
        self.advance(); // consume 'fn'

        if self.check_kind(TokenKind::Identifier) {
            let token = self.advance();
            let name = Variable::new(token.lexeme.clone(), token.position);
            let params = self.parse_parameter_list()?;
            let body = self.parse_block()?;

            return Ok(Statement::Declaration(Declaration::NamedFuncDecl(
                NamedFuncDecl {
                    name,
                    params,
                    body,
                    position: loc,
                },
            )));
        }

        let params = self.parse_parameter_list()?;
        let body = self.parse_block()?;
        let args = self.parse_argument_list()?;
        self.match_token(TokenKind::Punctuation, ";");

        Ok(Statement::Declaration(Declaration::AnonFuncCall(
            AnonFuncCall {
                decl: AnonFuncDecl {
                    params,
                    body,
                    position: loc,
                },
                args,
                position: loc,
            },
        )))
    }

    /// `fn (params) { body }` in value position, called if an argument list
    /// follows the body
    pub(crate) fn parse_anon_function(&mut self) -> CompileResult<Declaration> {
        let loc = self.current_position();
        self.advance(); // consume 'fn'

        let params = self.parse_parameter_list()?;
        let body = self.parse_block()?;
        let decl = AnonFuncDecl {
            params,
            body,
            position: loc,
        };

        if self.check(TokenKind::Grouping, "(") {
            let args = self.parse_argument_list()?;
            return Ok(Declaration::AnonFuncCall(AnonFuncCall {
                decl,
                args,
                position: loc,
            }));
        }

        Ok(Declaration::AnonFuncDecl(decl))
    }

    /// `name(args)`; the cursor must be on the name
    pub(crate) fn parse_named_call(&mut self) -> CompileResult<NamedFuncCall> {
        if !self.check_kind(TokenKind::Identifier) {
            return Err(self.internal_error("named call parsed from a non-identifier token"));
        }
        let token = self.advance();
        let name = Variable::new(token.lexeme.clone(), token.position);
        let position = name.position;
        let args = self.parse_argument_list()?;

        Ok(NamedFuncCall {
            name,
            args,
            position,
        })
    }

    /// Parse parameter list: (name, name = default, ...)
    pub(crate) fn parse_parameter_list(&mut self) -> CompileResult<Vec<Parameter>> {
        self.parse_list(Self::parse_parameter)
    }

    fn parse_parameter(&mut self) -> CompileResult<Parameter> {
        let variable = self.expect_variable(ErrorKind::ExpectedArgument)?;

        if self.match_token(TokenKind::Operator, "=") {
            let default = self.parse_expression(0)?;
            return Ok(Parameter::Defaulted { variable, default });
        }

        Ok(Parameter::Plain(variable))
    }

    /// Parse argument list: (expr, expr, ...)
    pub(crate) fn parse_argument_list(&mut self) -> CompileResult<Vec<Expression>> {
        self.parse_list(|parser| parser.parse_expression(0))
    }

    /// Shared shape of parameter and argument lists. Items are comma
    /// separated and a trailing comma before `)` is allowed.
    fn parse_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> CompileResult<T>,
    ) -> CompileResult<Vec<T>> {
        if !self.match_token(TokenKind::Grouping, "(") {
            return Err(CompilerError::unexpected_token(
                "opening parenthesis",
                self.current(),
                self.current_position(),
            ));
        }

        let mut items = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::Grouping, ")") {
            if !items.is_empty() {
                if !self.match_token(TokenKind::Punctuation, ",") {
                    return Err(CompilerError::new(
                        ErrorKind::MissingCommaInArgumentList,
                        self.current_position(),
                    ));
                }
                if self.is_at_end() || self.check(TokenKind::Grouping, ")") {
                    break;
                }
            }
            items.push(item(self)?);
        }

        if !self.match_token(TokenKind::Grouping, ")") {
            return Err(CompilerError::new(
                ErrorKind::MissingCloseParenthesisAfterArgument,
                self.current_position(),
            ));
        }

        Ok(items)
    }
}

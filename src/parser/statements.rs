//! Statement parsing implementation
//!
//! This module handles parsing of all Lup statement types:
//!
//! - Bindings: `let x;`, `let x = 1;`, `const y = 2;`
//! - Control flow: `if` / `else if` / `else`, `while`, `loop`, `for x -> xs`
//! - Jump statements: `return`, `break`, `continue`
//! - `import name;`
//! - Assignments: `x += 1;`
//! - Expression statements: `f(1);`, `a + b;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= if_stmt | while_stmt | loop_stmt | for_stmt | fn_stmt
//!             | return_stmt | break_stmt | continue_stmt | import_stmt
//!             | let_stmt | const_stmt | ident_stmt | expr_stmt
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::parser::ast::*;
use crate::parser::operators;
use crate::parser::parse::Parser;
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();

        if self.check_keyword("if") {
            return self.parse_if_statement();
        }

        if self.check_keyword("while") {
            return self.parse_while_statement();
        }

        if self.check_keyword("loop") {
            self.advance();
            let body = self.parse_block()?;
            return Ok(Statement::ControlFlow(ControlFlow::Loop {
                body,
                position: loc,
            }));
        }

        if self.check_keyword("for") {
            return self.parse_for_statement();
        }

        if self.check_keyword("fn") {
            return self.parse_fn_statement();
        }

        if self.match_token(TokenKind::Keyword, "return") {
            let value = self.parse_expression(0)?;
            self.expect_semicolon()?;
            return Ok(Statement::Return {
                value,
                position: loc,
            });
        }

        if self.match_token(TokenKind::Keyword, "break") {
            self.expect_semicolon()?;
            return Ok(Statement::Break { position: loc });
        }

        if self.match_token(TokenKind::Keyword, "continue") {
            self.expect_semicolon()?;
            return Ok(Statement::Continue { position: loc });
        }

        if self.match_token(TokenKind::Keyword, "import") {
            let target = self.expect_variable(ErrorKind::ExpectedIdentifierAfterImport)?;
            self.expect_semicolon()?;
            return Ok(Statement::Import {
                target,
                position: loc,
            });
        }

        if self.check_keyword("let") {
            return self.parse_let_statement();
        }

        if self.check_keyword("const") {
            return self.parse_const_statement();
        }

        if self.check_kind(TokenKind::Identifier) {
            return self.parse_identifier_statement();
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression(0)?;
        self.expect_semicolon()?;
        Ok(Statement::Expression(expr))
    }

    /// `if cond { } else if cond { } ... else { }`
    fn parse_if_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();
        self.advance(); // consume 'if'

        let condition = self.parse_expression(0)?;
        let body = self.parse_block()?;

        let mut elseifs = Vec::new();
        let mut else_branch = None;

        while self.check_keyword("else") {
            let else_loc = self.current_position();
            self.advance();

            if self.match_token(TokenKind::Keyword, "if") {
                let condition = self.parse_expression(0)?;
                let body = self.parse_block()?;
                elseifs.push(ElseIf {
                    condition,
                    body,
                    position: else_loc,
                });
            } else {
                let body = self.parse_block()?;
                else_branch = Some(Else {
                    body,
                    position: else_loc,
                });
                break;
            }
        }

        Ok(Statement::ControlFlow(ControlFlow::If(If {
            condition,
            body,
            elseifs,
            else_branch,
            position: loc,
        })))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();
        self.advance(); // consume 'while'

        let condition = self.parse_expression(0)?;
        let body = self.parse_block()?;

        Ok(Statement::ControlFlow(ControlFlow::While {
            condition,
            body,
            position: loc,
        }))
    }

    /// `for x -> iterable { body }`
    fn parse_for_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();
        self.advance(); // consume 'for'

        let variable = self.expect_variable(ErrorKind::ExpectedVariableAfterFor)?;

        if !self.match_token(TokenKind::Operator, operators::FOR_ARROW) {
            return Err(CompilerError::new(
                ErrorKind::ExpectedOperatorAfterFor,
                self.current_position(),
            ));
        }

        let iterable = self.parse_expression(0)?;
        let body = self.parse_block()?;

        Ok(Statement::ControlFlow(ControlFlow::For {
            variable,
            iterable,
            body,
            position: loc,
        }))
    }

    /// `let x;` or `let x = value;`
    fn parse_let_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();
        self.advance(); // consume 'let'

        let variable = self.expect_variable(ErrorKind::ExpectedVariableAfterLet)?;

        if self.match_token(TokenKind::Operator, "=") {
            let value = self.parse_expression(0)?;
            self.expect_semicolon()?;
            return Ok(Statement::LetValue {
                variable,
                value,
                position: loc,
            });
        }

        self.expect_semicolon()?;
        Ok(Statement::LetVariable {
            variable,
            position: loc,
        })
    }

    /// `const x = value;`
    fn parse_const_statement(&mut self) -> CompileResult<Statement> {
        let loc = self.current_position();
        self.advance(); // consume 'const'

        let variable = self.expect_variable(ErrorKind::ExpectedVariableAfterConst)?;

        if !self.match_token(TokenKind::Operator, "=") {
            return Err(CompilerError::new(
                ErrorKind::ExpectedEqualsAfterConst,
                self.current_position(),
            ));
        }

        let value = self.parse_expression(0)?;
        self.expect_semicolon()?;

        Ok(Statement::Const {
            variable,
            value,
            position: loc,
        })
    }

    /// A statement that starts with an identifier: a call `f(args);`, an
    /// assignment `x op= value;`, or an expression statement
    fn parse_identifier_statement(&mut self) -> CompileResult<Statement> {
        let next = self.peek()?;
        let is_call = next.is(TokenKind::Grouping, "(");
        let is_assignment =
            next.kind == TokenKind::Operator && operators::is_assignment(&next.lexeme);

        if is_call {
            let call = self.parse_named_call()?;
            self.expect_semicolon()?;
            return Ok(Statement::Declaration(Declaration::NamedFuncCall(call)));
        }

        if is_assignment {
            let loc = self.current_position();
            let token = self.advance();
            let variable = Variable::new(token.lexeme.clone(), token.position);
            let op = self.advance().lexeme.clone();

            let value = self.parse_expression(0)?;
            self.expect_semicolon()?;

            return Ok(Statement::Assignment {
                op,
                variable,
                value,
                position: loc,
            });
        }

        let expr = self.parse_expression(0)?;
        self.expect_semicolon()?;
        Ok(Statement::Expression(expr))
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn first(source: &str) -> Statement {
        parse_source(source)
            .unwrap()
            .statements
            .into_iter()
            .next()
            .unwrap()
    }

    fn num(value: f64, line: usize, column: usize) -> Expression {
        Expression::Value(Value::Number {
            value,
            position: Position::new(line, column),
        })
    }

    #[test]
    fn test_let_forms() {
        assert_eq!(
            first("let x;"),
            Statement::LetVariable {
                variable: Variable::new("x", Position::new(1, 4)),
                position: Position::new(1, 0),
            }
        );
        assert_eq!(
            first("let x = 5;"),
            Statement::LetValue {
                variable: Variable::new("x", Position::new(1, 4)),
                value: num(5.0, 1, 8),
                position: Position::new(1, 0),
            }
        );

        let err = parse_source("let x 5;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingSemicolon);
        assert_eq!(err.position, Position::new(1, 6));

        let err = parse_source("let 5;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedVariableAfterLet);
    }

    #[test]
    fn test_const_errors() {
        let err = parse_source("const = 1;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedVariableAfterConst);
        assert_eq!(err.position, Position::new(1, 6));

        let err = parse_source("const x;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedEqualsAfterConst);
        assert_eq!(err.position, Position::new(1, 7));
    }

    #[test]
    fn test_assignment_operator_kept() {
        match first("total //= 2;") {
            Statement::Assignment {
                op,
                variable,
                value,
                position,
            } => {
                assert_eq!(op, "//=");
                assert_eq!(variable.name, "total");
                assert_eq!(value, num(2.0, 1, 10));
                assert_eq!(position, Position::new(1, 0));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_expression_statement() {
        assert!(matches!(
            first("y + 1;"),
            Statement::Expression(Expression::BinaryOp { .. })
        ));
    }

    #[test]
    fn test_if_chain() {
        let src = "if a { } else if b { x = 1; } else if c { } else { }";
        match first(src) {
            Statement::ControlFlow(ControlFlow::If(node)) => {
                assert_eq!(node.position, Position::new(1, 0));
                assert_eq!(node.elseifs.len(), 2);
                assert_eq!(node.elseifs[0].position, Position::new(1, 9));
                assert_eq!(node.elseifs[0].body.len(), 1);
                let else_branch = node.else_branch.unwrap();
                assert!(else_branch.body.is_empty());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        match first("if a { }") {
            Statement::ControlFlow(ControlFlow::If(node)) => {
                assert!(node.elseifs.is_empty());
                assert!(node.else_branch.is_none());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop() {
        match first("for item -> items { print(item); }") {
            Statement::ControlFlow(ControlFlow::For {
                variable,
                iterable,
                body,
                ..
            }) => {
                assert_eq!(variable, Variable::new("item", Position::new(1, 4)));
                assert_eq!(
                    iterable,
                    Expression::Value(Value::Variable(Variable::new(
                        "items",
                        Position::new(1, 12)
                    )))
                );
                assert_eq!(body.position, Position::new(1, 18));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_for_errors() {
        let err = parse_source("for 1 -> xs { }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedVariableAfterFor);

        let err = parse_source("for x in xs { }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedOperatorAfterFor);
        assert_eq!(err.position, Position::new(1, 6));
    }

    #[test]
    fn test_loop_and_while() {
        assert!(matches!(
            first("loop { break; }"),
            Statement::ControlFlow(ControlFlow::Loop { .. })
        ));
        match first("while x < 3 { continue; }") {
            Statement::ControlFlow(ControlFlow::While {
                condition, body, ..
            }) => {
                assert!(matches!(condition, Expression::BinaryOp { ref op, .. } if op == "<"));
                assert_eq!(
                    body.statements,
                    vec![Statement::Continue {
                        position: Position::new(1, 14)
                    }]
                );
            }
            other => panic!("expected while, got {:?}", other),
        }

        let err = parse_source("while x ;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingOpenBrace);
    }

    #[test]
    fn test_jumps_require_semicolon() {
        assert_eq!(
            parse_source("break").unwrap_err().kind,
            ErrorKind::MissingSemicolon
        );
        assert_eq!(
            parse_source("continue }").unwrap_err().kind,
            ErrorKind::MissingSemicolon
        );
    }

    #[test]
    fn test_import() {
        assert_eq!(
            first("import math;"),
            Statement::Import {
                target: Variable::new("math", Position::new(1, 7)),
                position: Position::new(1, 0),
            }
        );
        let err = parse_source("import 3;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedIdentifierAfterImport);
    }

    #[test]
    fn test_return_requires_value() {
        assert!(matches!(first("return 1;"), Statement::Return { .. }));
        let err = parse_source("return;").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
    }
}

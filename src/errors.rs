//! Diagnostic types shared by every stage of the front end
//!
//! This module defines [`CompilerError`], the single error type returned by the
//! lexer, the parser and the type checker. It pairs a [`Position`] with an
//! [`ErrorKind`] describing what went wrong.
//!
//! All errors are fatal: the first one aborts the pipeline. The rendered form
//! is always `Line <line>, Column <column>: <message>` so that downstream
//! tooling can parse it.
//!
//! `Internal*` kinds signal a broken invariant inside this crate rather than a
//! mistake in the user's program. Use [`CompilerError::is_internal`] to tell
//! the two apart.

use crate::checker::types::Type;
use crate::parser::ast::Position;
use thiserror::Error;

/// The pipeline stage a diagnostic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raised by more than one stage (unexpected end of input)
    Shared,
    Lexer,
    Parser,
    TypeChecker,
}

/// Every diagnostic the front end can produce
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("Unexpected EOF")]
    UnexpectedEof,

    // Lexer
    #[error("Unrecognized character {0}")]
    InvalidCharacter(char),

    #[error("Missing an ending quote")]
    UnterminatedString,

    #[error(
        "Number should start with 0x for hexadecimal or 0b for binary. Found a number that starts with {0}"
    )]
    InvalidNumberType(String),

    #[error("[Internal] {0}")]
    InternalLexer(String),

    // Parser
    #[error("Expected token of type {expected}, but found {found} instead")]
    UnexpectedToken { expected: String, found: String },

    #[error("Missing semicolon")]
    MissingSemicolon,

    #[error("Missing opening brace before code block")]
    MissingOpenBrace,

    #[error("Missing closing brace after code block")]
    MissingCloseBrace,

    #[error("Missing closing parenthesis")]
    MissingCloseParenthesis,

    #[error("Missing closing parenthesis after arguments")]
    MissingCloseParenthesisAfterArgument,

    #[error("Missing comma after an argument")]
    MissingCommaInArgumentList,

    #[error("Missing closing brackets after array literal")]
    UnterminatedArrayLiteral,

    #[error("Expected a variable name after the \"for\" keyword")]
    ExpectedVariableAfterFor,

    #[error("Expected an operator after the variable in a for loop")]
    ExpectedOperatorAfterFor,

    #[error("Expected a variable name after the \"const\" keyword")]
    ExpectedVariableAfterConst,

    #[error(
        "Expected an equal sign after the variable name in a const declaration (hint: constants must always be initialized with a value)"
    )]
    ExpectedEqualsAfterConst,

    #[error("Expected a variable name after the \"let\" keyword")]
    ExpectedVariableAfterLet,

    #[error("Expected an argument")]
    ExpectedArgument,

    #[error("Expected an identifier after the \"import\" keyword")]
    ExpectedIdentifierAfterImport,

    #[error("Blocks and expressions are nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("[Internal] {0}")]
    InternalParser(String),

    // Type checker
    #[error("Mismatched types {left} and {right}")]
    MismatchedTypes { left: Type, right: Type },

    #[error("Cannot assign to undeclared variable {0}")]
    AssignmentToUninitializedVariable(String),

    #[error("Reference to uninitialized variable {0}")]
    ReferenceToUninitializedVariable(String),

    #[error("Cannot assign to constant variable {0}")]
    AssignmentToConstantVariable(String),

    #[error("Function {0} is not defined")]
    FunctionIsNotDefined(String),

    #[error("Variable {0} is not callable")]
    VariableIsNotCallable(String),

    #[error("[Internal] {0}")]
    InternalTypeChecker(String),
}

impl ErrorKind {
    pub fn stage(&self) -> Stage {
        match self {
            ErrorKind::UnexpectedEof => Stage::Shared,

            ErrorKind::InvalidCharacter(_)
            | ErrorKind::UnterminatedString
            | ErrorKind::InvalidNumberType(_)
            | ErrorKind::InternalLexer(_) => Stage::Lexer,

            ErrorKind::UnexpectedToken { .. }
            | ErrorKind::MissingSemicolon
            | ErrorKind::MissingOpenBrace
            | ErrorKind::MissingCloseBrace
            | ErrorKind::MissingCloseParenthesis
            | ErrorKind::MissingCloseParenthesisAfterArgument
            | ErrorKind::MissingCommaInArgumentList
            | ErrorKind::UnterminatedArrayLiteral
            | ErrorKind::ExpectedVariableAfterFor
            | ErrorKind::ExpectedOperatorAfterFor
            | ErrorKind::ExpectedVariableAfterConst
            | ErrorKind::ExpectedEqualsAfterConst
            | ErrorKind::ExpectedVariableAfterLet
            | ErrorKind::ExpectedArgument
            | ErrorKind::ExpectedIdentifierAfterImport
            | ErrorKind::NestingTooDeep(_)
            | ErrorKind::InternalParser(_) => Stage::Parser,

            ErrorKind::MismatchedTypes { .. }
            | ErrorKind::AssignmentToUninitializedVariable(_)
            | ErrorKind::ReferenceToUninitializedVariable(_)
            | ErrorKind::AssignmentToConstantVariable(_)
            | ErrorKind::FunctionIsNotDefined(_)
            | ErrorKind::VariableIsNotCallable(_)
            | ErrorKind::InternalTypeChecker(_) => Stage::TypeChecker,
        }
    }

    /// True for kinds that indicate a defect in this crate, not in the input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ErrorKind::InternalLexer(_)
                | ErrorKind::InternalParser(_)
                | ErrorKind::InternalTypeChecker(_)
        )
    }
}

/// A positioned diagnostic
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Line {}, Column {}: {}", .position.line, .position.column, .kind)]
pub struct CompilerError {
    pub position: Position,
    pub kind: ErrorKind,
}

impl CompilerError {
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        CompilerError { position, kind }
    }

    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }

    pub fn is_internal(&self) -> bool {
        self.kind.is_internal()
    }

    pub(crate) fn unexpected_token(
        expected: impl Into<String>,
        found: impl ToString,
        position: Position,
    ) -> Self {
        CompilerError::new(
            ErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.to_string(),
            },
            position,
        )
    }
}

pub type CompileResult<T> = Result<T, CompilerError>;

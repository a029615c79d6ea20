//! Pipeline observation hooks
//!
//! An [`Observer`] is told about every token the lexer emits, every statement
//! the parser finishes and every scope the type checker opens. All methods
//! default to doing nothing, so implementors only override what they need.
//! The CLI uses this to dump intermediate results; tests use it to record
//! what each stage saw.

use crate::checker::scope::{ScopeId, ScopeTree};
use crate::parser::ast::Statement;
use crate::parser::token::Token;

pub trait Observer {
    fn token(&mut self, _token: &Token) {}

    /// Called once per statement, after it has been fully parsed. Nested
    /// statements are reported before the statement that contains them.
    fn statement(&mut self, _statement: &Statement) {}

    fn scope_entered(&mut self, _scopes: &ScopeTree, _scope: ScopeId) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

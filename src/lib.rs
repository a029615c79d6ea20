//! # Introduction
//!
//! Lup is the front end of a small scripting language. It turns source text
//! into a checked syntax tree: the lexer produces tokens, the parser builds a
//! [`parser::ast::Program`], and the type checker walks it once to build a
//! [`checker::ScopeTree`] while verifying how variables are used.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → TypeChecker → Scope tree
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`checker`]: infers types, tracks `let`/`const` state and scoping.
//! 3. [`errors`]: the diagnostic every stage returns on failure.
//! 4. [`observer`]: optional hooks to watch each stage work.
//! 5. [`render`]: compact and verbose debug renderings of the AST.
//!
//! Every stage stops at the first error. A diagnostic renders as
//! `Line <line>, Column <column>: <message>`.
//!
//! ```
//! let analysis = lup::compile("let x = 1; x = x + 2;").unwrap();
//! assert_eq!(analysis.program.len(), 2);
//!
//! let err = lup::compile("const x = 1; x = 2;").unwrap_err();
//! assert_eq!(err.to_string(), "Line 1, Column 13: Cannot assign to constant variable x");
//! ```

pub mod checker;
pub mod errors;
pub mod observer;
pub mod parser;
pub mod render;

pub use errors::{CompileResult, CompilerError, ErrorKind, Stage};

use checker::{ScopeTree, TypeChecker};
use observer::{NoopObserver, Observer};
use parser::ast::Program;
use parser::{Lexer, Parser};

/// Result of a successful run of the whole pipeline
#[derive(Debug, Clone)]
pub struct Analysis {
    pub program: Program,
    pub scopes: ScopeTree,
}

/// Lex, parse and type check `source`
pub fn compile(source: &str) -> CompileResult<Analysis> {
    compile_with(source, &mut NoopObserver)
}

/// Like [`compile`], reporting tokens, statements and scopes to `observer`
/// as each stage produces them
pub fn compile_with(source: &str, observer: &mut dyn Observer) -> CompileResult<Analysis> {
    let tokens = Lexer::with_observer(source, observer).tokenize()?;
    let program = Parser::with_observer(tokens, observer).parse()?;

    let mut checker = TypeChecker::with_observer(observer);
    checker.initial_pass(&program)?;

    Ok(Analysis {
        program,
        scopes: checker.into_scopes(),
    })
}

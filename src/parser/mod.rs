//! Lup source code parser
//!
//! This module transforms Lup source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across `statements`,
//!   `declarations` and `expressions`
//! - [`operators`]: The operator table shared by the lexer and the parser
//! - [`token`]: Token definitions
//! - [`ast`]: AST node definitions
//!
//! # Language Surface
//!
//! - Values: numbers, strings, booleans, `null`, arrays, variables
//! - Bindings: `let`, `const`, assignment with any compound operator
//! - Control flow: `if` / `else if` / `else`, `while`, `loop`, `for x -> xs`
//! - Functions: named and anonymous, default parameters, immediate invocation
//! - `return`, `break`, `continue`, `import`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod operators;
pub mod parse;
mod statements;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use parse::{parse_source, Parser};
pub use token::{Token, TokenKind};

//! Semantic analysis
//!
//! - [`types`]: the static types inferred for values
//! - [`scope`]: the scope tree the checker fills in
//! - [`type_checker`]: the single pass over a parsed program

pub mod scope;
pub mod type_checker;
pub mod types;

pub use scope::{ScopeId, ScopeTree, VariableState};
pub use type_checker::TypeChecker;
pub use types::Type;

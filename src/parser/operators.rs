//! Operator table
//!
//! The fixed registry of operator lexemes, grouped into precedence bands.
//! The lexer uses [`is_operator_prefix`] / [`is_operator`] to match the
//! longest operator greedily, and the parser uses [`precedence`] to drive
//! precedence climbing.
//!
//! Every proper prefix of a multi-character operator is itself an operator or
//! a prefix of one, so greedy matching never needs to backtrack.

use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::parser::ast::Position;

/// Precedence bands, lowest binding first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Assignment = 1,
    Boolean = 2,
    Comparison = 3,
    Additive = 4,
    Multiplicative = 5,
    Exponent = 6,
    Bitwise = 7,
    Shift = 8,
    Range = 9,
    Unary = 10,
    Member = 11,
}

pub const ASSIGNMENT: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "//=", "**=", "|=", "&=", "^=", "~=", "<<=", ">>=", "||=",
    "&&=", "^^=", "??=",
];
pub const BOOLEAN: &[&str] = &["&&", "||", "^^", "!", "??"];
pub const COMPARISON: &[&str] = &["==", "!=", ">", ">=", "<", "<="];
pub const ADDITIVE: &[&str] = &["+", "-"];
pub const MULTIPLICATIVE: &[&str] = &["*", "/", "%", "//"];
pub const EXPONENT: &[&str] = &["**"];
pub const BITWISE: &[&str] = &["&", "|", "^"];
pub const SHIFT: &[&str] = &["<<", ">>"];
pub const RANGE: &[&str] = &[".."];
pub const UNARY: &[&str] = &["!", "~", "..."];
pub const MEMBER: &[&str] = &[".", "?."];

/// Separates the loop variable from the iterable in `for x -> xs`
pub const FOR_ARROW: &str = "->";

/// Bands in lookup order. `!` sits in both the boolean and unary bands and
/// resolves to the higher one.
const BANDS: &[(Precedence, &[&str])] = &[
    (Precedence::Member, MEMBER),
    (Precedence::Unary, UNARY),
    (Precedence::Range, RANGE),
    (Precedence::Shift, SHIFT),
    (Precedence::Bitwise, BITWISE),
    (Precedence::Exponent, EXPONENT),
    (Precedence::Multiplicative, MULTIPLICATIVE),
    (Precedence::Additive, ADDITIVE),
    (Precedence::Comparison, COMPARISON),
    (Precedence::Boolean, BOOLEAN),
    (Precedence::Assignment, ASSIGNMENT),
];

impl Precedence {
    /// The band an operator binds in. `None` for non-operators and for `->`,
    /// which never appears inside an expression.
    pub fn of(lexeme: &str) -> Option<Precedence> {
        BANDS
            .iter()
            .find(|(_, ops)| ops.contains(&lexeme))
            .map(|(band, _)| *band)
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Iterate over every registered operator lexeme
pub fn all() -> impl Iterator<Item = &'static str> {
    BANDS
        .iter()
        .flat_map(|(_, ops)| ops.iter().copied())
        .chain(std::iter::once(FOR_ARROW))
}

/// True if `lexeme` is a complete registered operator
pub fn is_operator(lexeme: &str) -> bool {
    all().any(|op| op == lexeme)
}

/// True if `lexeme` is a registered operator or the beginning of one
pub fn is_operator_prefix(lexeme: &str) -> bool {
    !lexeme.is_empty() && all().any(|op| op.starts_with(lexeme))
}

/// Numeric precedence of an operator that binds inside expressions.
///
/// Asking for the precedence of anything else is a bug in the caller.
pub fn precedence(lexeme: &str, position: Position) -> CompileResult<u8> {
    Precedence::of(lexeme).map(Precedence::level).ok_or_else(|| {
        CompilerError::new(
            ErrorKind::InternalParser(format!(
                "Operator '{}' not found in precedence table",
                lexeme
            )),
            position,
        )
    })
}

pub fn is_assignment(lexeme: &str) -> bool {
    ASSIGNMENT.contains(&lexeme)
}

pub fn is_comparison(lexeme: &str) -> bool {
    COMPARISON.contains(&lexeme)
}

/// Operators accepted in prefix position: the unary band plus negation
pub fn is_prefix(lexeme: &str) -> bool {
    UNARY.contains(&lexeme) || lexeme == "-"
}

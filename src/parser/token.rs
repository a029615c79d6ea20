//! Token model
//!
//! The lexer's output alphabet. A [`Token`] is an opaque lexeme tagged with a
//! [`TokenKind`] and the [`Position`] of its first character. Classification
//! beyond the kind (which keyword, which operator) is done by comparing
//! lexemes, so the parser can match on `(kind, lexeme)` pairs.

use super::ast::Position;
use std::fmt;

/// All token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Operator,
    /// `,` `:` `;`
    Punctuation,
    /// `(` `)` `[` `]` `{` `}`
    Grouping,
    /// `'` or `"`
    Quote,
    /// String body between two quotes, escapes kept verbatim
    String,
    /// Numeric literal text, underscores included
    Number,
    Identifier,
    Keyword,
    Boolean,
    Null,
    Eof,
}

impl TokenKind {
    /// Upper-case tag used in diagnostics and debug output
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Operator => "OPERATOR",
            TokenKind::Punctuation => "PUNCTUATION",
            TokenKind::Grouping => "GROUPING",
            TokenKind::Quote => "QUOTE",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Null => "NULL",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    pub fn eof(position: Position) -> Self {
        Token::new(TokenKind::Eof, "", position)
    }

    /// True when this token has the given kind and exact lexeme
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            kind => write!(f, "{}({})", kind, self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tags_kind_and_lexeme() {
        let token = Token::new(TokenKind::Operator, "+=", Position::new(1, 4));
        assert_eq!(token.to_string(), "OPERATOR(+=)");
        assert_eq!(Token::eof(Position::new(2, 0)).to_string(), "EOF");
    }

    #[test]
    fn test_is_matches_kind_and_lexeme() {
        let token = Token::new(TokenKind::Grouping, "{", Position::default());
        assert!(token.is(TokenKind::Grouping, "{"));
        assert!(!token.is(TokenKind::Grouping, "}"));
        assert!(!token.is(TokenKind::Punctuation, "{"));
    }
}

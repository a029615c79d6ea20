//! Lexer (tokenizer) for Lup source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The input is walked one `char` at a time; every token records the
//! [`Position`] of its first character. `#` starts a comment that runs to the
//! end of the line.
//!
//! Literals are kept as text: numbers keep their `_` separators and radix
//! prefix, strings keep their escape sequences. Turning them into values is
//! the parser's job.

use super::ast::Position;
use super::operators;
use super::token::{Token, TokenKind};
use crate::errors::{CompileResult, CompilerError, ErrorKind};
use crate::observer::Observer;
use tracing::debug;

const KEYWORDS: &[&str] = &[
    "const", "let", "if", "else", "for", "while", "loop", "fn", "class", "return", "break",
    "continue", "import",
];

fn is_grouping(ch: char) -> bool {
    matches!(ch, '(' | ')' | '[' | ']' | '{' | '}')
}

fn is_punctuation(ch: char) -> bool {
    matches!(ch, ',' | ':' | ';')
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"')
}

fn is_dec_digit(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '_'
}

fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit() || ch == '_'
}

fn is_bin_digit(ch: char) -> bool {
    matches!(ch, '0' | '1' | '_')
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Lexer for Lup source code
pub struct Lexer<'o> {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    observer: Option<&'o mut dyn Observer>,
}

impl<'o> Lexer<'o> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 0,
            observer: None,
        }
    }

    /// Create a lexer that reports every token it produces to `observer`.
    pub fn with_observer(input: &str, observer: &'o mut dyn Observer) -> Self {
        Self {
            observer: Some(observer),
            ..Self::new(input)
        }
    }

    /// Tokenize the entire input. The result always ends with exactly one
    /// EOF token.
    pub fn tokenize(&mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                self.skip_line_comment();
            } else if is_grouping(ch) {
                let token = self.single(TokenKind::Grouping);
                self.emit(&mut tokens, token);
            } else if is_punctuation(ch) {
                let token = self.single(TokenKind::Punctuation);
                self.emit(&mut tokens, token);
            } else if ch.is_ascii_digit() {
                let token = self.number_literal()?;
                self.emit(&mut tokens, token);
            } else if is_identifier_start(ch) {
                let token = self.identifier_or_keyword()?;
                self.emit(&mut tokens, token);
            } else if is_quote(ch) {
                let open = self.single(TokenKind::Quote);
                self.emit(&mut tokens, open);

                let body = self.string_body(ch)?;
                self.emit(&mut tokens, body);

                if self.is_at_end() {
                    return Err(CompilerError::new(
                        ErrorKind::UnterminatedString,
                        self.current_location(),
                    ));
                }
                let close = self.single(TokenKind::Quote);
                self.emit(&mut tokens, close);
            } else {
                let token = self.operator()?;
                self.emit(&mut tokens, token);
            }
        }

        let eof = Token::eof(self.current_location());
        self.emit(&mut tokens, eof);

        debug!(tokens = tokens.len(), "lexed input");
        Ok(tokens)
    }

    fn emit(&mut self, tokens: &mut Vec<Token>, token: Token) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.token(&token);
        }
        tokens.push(token);
    }

    /// Consume one character as a token of the given kind
    fn single(&mut self, kind: TokenKind) -> Token {
        let loc = self.current_location();
        let lexeme = self.advance().map(String::from).unwrap_or_default();
        Token::new(kind, lexeme, loc)
    }

    /// Greedily match the longest registered operator
    fn operator(&mut self) -> CompileResult<Token> {
        let loc = self.current_location();
        let first = match self.peek() {
            Some(ch) => ch,
            None => return Err(CompilerError::new(ErrorKind::UnexpectedEof, loc)),
        };

        let mut lexeme = first.to_string();
        if !operators::is_operator_prefix(&lexeme) {
            return Err(CompilerError::new(ErrorKind::InvalidCharacter(first), loc));
        }
        self.advance();

        while let Some(next) = self.peek() {
            lexeme.push(next);
            if operators::is_operator_prefix(&lexeme) {
                self.advance();
            } else {
                lexeme.pop();
                break;
            }
        }

        // A dangling prefix such as a lone `?` is not an operator
        if !operators::is_operator(&lexeme) {
            return Err(CompilerError::new(ErrorKind::InvalidCharacter(first), loc));
        }

        Ok(Token::new(TokenKind::Operator, lexeme, loc))
    }

    /// Lex a numeric literal: decimal (with optional fraction), `0x` hex or
    /// `0b` binary. The token carries the literal text.
    fn number_literal(&mut self) -> CompileResult<Token> {
        let loc = self.current_location();
        let first = match self.peek() {
            Some(ch) if ch.is_ascii_digit() => ch,
            _ => {
                return Err(CompilerError::new(
                    ErrorKind::InternalLexer(
                        "number sub-lexer invoked on a non-digit".to_string(),
                    ),
                    loc,
                ))
            }
        };
        self.advance();

        let mut num_str = String::new();
        num_str.push(first);

        match self.peek() {
            Some(ch) if is_dec_digit(ch) || ch == '.' => {
                num_str.push_str(&self.eat_while(is_dec_digit));

                // `1..5` is a range, not a fraction
                if self.peek() == Some('.')
                    && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit())
                {
                    self.advance();
                    num_str.push('.');
                    num_str.push_str(&self.eat_while(is_dec_digit));
                }
            }
            Some(radix @ ('x' | 'b')) if first == '0' => {
                let prefix_loc = self.current_location();
                self.advance();
                num_str.push(radix);

                let digits = if radix == 'x' {
                    self.eat_while(is_hex_digit)
                } else {
                    self.eat_while(is_bin_digit)
                };
                if digits.chars().all(|c| c == '_') {
                    num_str.push_str(&digits);
                    return Err(CompilerError::new(
                        ErrorKind::InvalidNumberType(num_str),
                        prefix_loc,
                    ));
                }
                num_str.push_str(&digits);
            }
            _ => {}
        }

        // a letter glued to any literal (`1x`, `12a`, `0x1g`) is a bad radix
        if let Some(ch) = self.peek().filter(char::is_ascii_alphabetic) {
            let letter_loc = self.current_location();
            num_str.push(ch);
            return Err(CompilerError::new(
                ErrorKind::InvalidNumberType(num_str),
                letter_loc,
            ));
        }

        Ok(Token::new(TokenKind::Number, num_str, loc))
    }

    /// Lex an identifier, keyword, boolean or `null`
    fn identifier_or_keyword(&mut self) -> CompileResult<Token> {
        let loc = self.current_location();
        if !self.peek().is_some_and(is_identifier_start) {
            return Err(CompilerError::new(
                ErrorKind::InternalLexer(
                    "identifier sub-lexer invoked on a non-identifier character".to_string(),
                ),
                loc,
            ));
        }

        let ident = self.eat_while(is_identifier);

        let kind = match ident.as_str() {
            word if KEYWORDS.contains(&word) => TokenKind::Keyword,
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier,
        };

        Ok(Token::new(kind, ident, loc))
    }

    /// Lex the body of a string up to (not including) the closing `quote`.
    /// Escapes are copied verbatim, so `\"` does not close a `"` string.
    fn string_body(&mut self, quote: char) -> CompileResult<Token> {
        let loc = self.current_location();
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                break;
            }
            if ch == '\\' {
                string.push(ch);
                self.advance();
                let escaped = self.advance().ok_or_else(|| {
                    CompilerError::new(ErrorKind::UnexpectedEof, self.current_location())
                })?;
                string.push(escaped);
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Ok(Token::new(TokenKind::String, string, loc))
    }

    /// Skip a `#` comment, leaving the newline for the main loop
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            value.push(ch);
            self.advance();
        }
        value
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Tokenize `source` without an observer
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    fn tok(kind: TokenKind, lexeme: &str, line: usize, column: usize) -> Token {
        Token::new(kind, lexeme, Position::new(line, column))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![Token::eof(Position::new(1, 0))]);
    }

    #[test]
    fn test_string_positions() {
        let tokens = tokenize(r#""abc""#).unwrap();
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::Quote, "\"", 1, 0),
                tok(TokenKind::String, "abc", 1, 1),
                tok(TokenKind::Quote, "\"", 1, 4),
                Token::eof(Position::new(1, 5)),
            ]
        );
    }

    #[test]
    fn test_empty_string() {
        let tokens = tokenize(r#""""#).unwrap();
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::Quote, "\"", 1, 0),
                tok(TokenKind::String, "", 1, 1),
                tok(TokenKind::Quote, "\"", 1, 1),
                Token::eof(Position::new(1, 2)),
            ]
        );
    }

    #[test]
    fn test_escaped_quote_stays_in_body() {
        let tokens = tokenize(r#"'it\'s'"#).unwrap();
        assert_eq!(tokens[1], tok(TokenKind::String, r"it\'s", 1, 1));
        assert_eq!(tokens[2], tok(TokenKind::Quote, "'", 1, 6));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#""abc"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
        assert_eq!(err.position, Position::new(1, 4));

        let err = tokenize("\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
    }

    #[test]
    fn test_trailing_backslash_is_eof() {
        let err = tokenize("\"abc\\").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_numbers() {
        for literal in ["1", "357", "999_999", "0.1", "1_000.000_001", "0x1A", "0xAa", "0b1100"] {
            let tokens = tokenize(literal).unwrap();
            assert_eq!(tokens.len(), 2, "{}", literal);
            assert_eq!(tokens[0], tok(TokenKind::Number, literal, 1, 0));
            assert_eq!(tokens[1].position, Position::new(1, literal.len()));
        }
    }

    #[test]
    fn test_invalid_number_type() {
        let err = tokenize("1xFF").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("1x".to_string()));
        assert_eq!(err.position, Position::new(1, 1));

        let err = tokenize("0z").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("0z".to_string()));

        let err = tokenize("0x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("0x".to_string()));
    }

    #[test]
    fn test_letter_after_any_digit_run() {
        let err = tokenize("12a").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("12a".to_string()));
        assert_eq!(err.position, Position::new(1, 2));

        let err = tokenize("00z").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("00z".to_string()));
        assert_eq!(err.position, Position::new(1, 2));

        let err = tokenize("x = 1.5e;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("1.5e".to_string()));
        assert_eq!(err.position, Position::new(1, 7));

        let err = tokenize("0x1fg").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumberType("0x1fg".to_string()));

        // separators and operators still end a literal
        assert_eq!(
            kinds("1_0+2"),
            vec![
                (TokenKind::Number, "1_0".to_string()),
                (TokenKind::Operator, "+".to_string()),
                (TokenKind::Number, "2".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_range_is_not_a_fraction() {
        assert_eq!(
            kinds("1..5"),
            vec![
                (TokenKind::Number, "1".to_string()),
                (TokenKind::Operator, "..".to_string()),
                (TokenKind::Number, "5".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_greedy_operators() {
        let ops: Vec<String> = tokenize("... //= ?. ** -> ??= !")
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.lexeme)
            .collect();
        assert_eq!(ops, vec!["...", "//=", "?.", "**", "->", "??=", "!"]);
    }

    #[test]
    fn test_adjacent_operators_split() {
        // `=-` is not a prefix of any operator
        assert_eq!(
            kinds("x=-1"),
            vec![
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Operator, "=".to_string()),
                (TokenKind::Operator, "-".to_string()),
                (TokenKind::Number, "1".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("let a = `b`;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCharacter('`'));
        assert_eq!(err.position, Position::new(1, 8));

        let err = tokenize("a ? b").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCharacter('?'));
    }

    #[test]
    fn test_word_classification() {
        assert_eq!(
            kinds("fn x2 true null _y import"),
            vec![
                (TokenKind::Keyword, "fn".to_string()),
                (TokenKind::Identifier, "x2".to_string()),
                (TokenKind::Boolean, "true".to_string()),
                (TokenKind::Null, "null".to_string()),
                (TokenKind::Identifier, "_y".to_string()),
                (TokenKind::Keyword, "import".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        let tokens = tokenize("let x; # comment ;;\n  x = 1;").unwrap();
        assert_eq!(tokens[3], tok(TokenKind::Identifier, "x", 2, 2));
        assert_eq!(tokens[4], tok(TokenKind::Operator, "=", 2, 4));
        assert_eq!(tokens.last().unwrap().position, Position::new(2, 8));
    }

    #[test]
    fn test_crlf_counts_one_line() {
        let tokens = tokenize("a\r\nb").unwrap();
        assert_eq!(tokens[1].position, Position::new(2, 0));
    }

    #[test]
    fn test_groupings_and_punctuation() {
        assert_eq!(
            kinds("([{}]);,:"),
            vec![
                (TokenKind::Grouping, "(".to_string()),
                (TokenKind::Grouping, "[".to_string()),
                (TokenKind::Grouping, "{".to_string()),
                (TokenKind::Grouping, "}".to_string()),
                (TokenKind::Grouping, "]".to_string()),
                (TokenKind::Grouping, ")".to_string()),
                (TokenKind::Punctuation, ";".to_string()),
                (TokenKind::Punctuation, ",".to_string()),
                (TokenKind::Punctuation, ":".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }
}

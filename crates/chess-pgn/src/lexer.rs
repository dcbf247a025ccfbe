//! PGN tokenizer.
//!
//! Splits PGN text into tokens carrying their 1-based line and column.
//! Lines starting with `%` are escape lines and are dropped entirely.
//! Move suffix annotations (`!`, `?`, `!!`, `??`, `!?`, `?!`) are lexed as
//! the equivalent numeric annotation glyphs.

use crate::PgnError;

/// What a token is, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    LeftAngle,
    RightAngle,
    Period,
    Asterisk,
    /// Quoted string with escapes removed.
    String(String),
    /// Move text, result or tag name.
    Symbol(String),
    /// A symbol made only of digits.
    Integer(u32),
    /// Numeric annotation glyph (`$n`).
    Nag(u8),
    /// Text of a `{...}` or `;...` comment, trimmed.
    Comment(String),
    Eof,
}

/// A token and the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Streaming tokenizer over PGN text.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
            done: false,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn take_while(&mut self, mut keep: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if !keep(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    /// Produces the next token, ending with a single [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Result<Token, PgnError> {
        loop {
            match self.chars.peek() {
                Some(&'%') if self.column == 1 => self.skip_line(),
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                _ => break,
            }
        }

        let (line, column) = (self.line, self.column);
        let token = |kind| Ok(Token { kind, line, column });

        let Some(c) = self.bump() else {
            self.done = true;
            return token(TokenKind::Eof);
        };

        match c {
            '[' => token(TokenKind::LeftBracket),
            ']' => token(TokenKind::RightBracket),
            '(' => token(TokenKind::LeftParen),
            ')' => token(TokenKind::RightParen),
            '<' => token(TokenKind::LeftAngle),
            '>' => token(TokenKind::RightAngle),
            '.' => token(TokenKind::Period),
            '*' => token(TokenKind::Asterisk),
            '"' => {
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some('"') => break,
                        Some('\\') => match self.bump() {
                            Some(escaped @ ('"' | '\\')) => value.push(escaped),
                            Some(other) => {
                                value.push('\\');
                                value.push(other);
                            }
                            None => break,
                        },
                        Some(other) => value.push(other),
                        None => {
                            return Err(PgnError::syntax(line, column, "unterminated string"))
                        }
                    }
                }
                token(TokenKind::String(value))
            }
            '{' => {
                let mut text = String::new();
                loop {
                    match self.bump() {
                        Some('}') => break,
                        Some(other) => text.push(other),
                        None => {
                            return Err(PgnError::syntax(line, column, "unterminated comment"))
                        }
                    }
                }
                token(TokenKind::Comment(text.trim().to_string()))
            }
            ';' => {
                let text = self.take_while(|c| c != '\n');
                token(TokenKind::Comment(text.trim().to_string()))
            }
            '$' => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                match digits.parse::<u8>() {
                    Ok(nag) => token(TokenKind::Nag(nag)),
                    Err(_) => Err(PgnError::syntax(
                        line,
                        column,
                        format!("invalid NAG '${digits}'"),
                    )),
                }
            }
            '!' | '?' => {
                let mut glyph = String::from(c);
                glyph.push_str(&self.take_while(|c| c == '!' || c == '?'));
                match suffix_nag(&glyph) {
                    Some(nag) => token(TokenKind::Nag(nag)),
                    None => Err(PgnError::syntax(
                        line,
                        column,
                        format!("unknown annotation '{glyph}'"),
                    )),
                }
            }
            c if c.is_ascii_alphanumeric() => {
                let mut text = String::from(c);
                text.push_str(&self.take_while(is_symbol_continuation));
                if text.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(n) = text.parse() {
                        return token(TokenKind::Integer(n));
                    }
                }
                token(TokenKind::Symbol(text))
            }
            other => Err(PgnError::syntax(
                line,
                column,
                format!("unexpected character '{other}'"),
            )),
        }
    }

    /// Tokenizes the whole input, including the trailing EOF token.
    pub fn tokenize(text: &str) -> Result<Vec<Token>, PgnError> {
        Lexer::new(text).collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

fn is_symbol_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '=' | ':' | '-' | '/')
}

fn suffix_nag(glyph: &str) -> Option<u8> {
    match glyph {
        "!" => Some(1),
        "?" => Some(2),
        "!!" => Some(3),
        "??" => Some(4),
        "!?" => Some(5),
        "?!" => Some(6),
        _ => None,
    }
}

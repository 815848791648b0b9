//! Lexer for the rule source language
//!
//! `%` starts a comment that runs to end of line. Identifiers are
//! `[A-Za-z0-9_]+`; those starting with an uppercase letter or `_` are
//! variables. Single-quoted text uses `''` for an embedded quote.

use std::fmt;

use super::errors::{LoadErrorKind, RuleBaseLoadError, RuleLoadResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Ident(String),
    Variable(String),
    Text(String),
    LParen,
    RParen,
    Comma,
    /// `:-`
    Neck,
    Dot,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::Ident(s) => write!(f, "identifier {}", s),
            Lexeme::Variable(s) => write!(f, "variable {}", s),
            Lexeme::Text(s) => write!(f, "text '{}'", s),
            Lexeme::LParen => f.write_str("'('"),
            Lexeme::RParen => f.write_str("')'"),
            Lexeme::Comma => f.write_str("','"),
            Lexeme::Neck => f.write_str("':-'"),
            Lexeme::Dot => f.write_str("'.'"),
        }
    }
}

/// A lexeme with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub lexeme: Lexeme,
    pub line: usize,
    pub column: usize,
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
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
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `source` into lexemes.
pub fn tokenize(source: &str) -> RuleLoadResult<Vec<Spanned>> {
    let mut cursor = Cursor {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
    };
    let mut out = Vec::new();

    while let Some(c) = cursor.peek() {
        let (line, column) = (cursor.line, cursor.column);

        if c.is_whitespace() {
            cursor.bump();
            continue;
        }

        if c == '%' {
            while let Some(c) = cursor.bump() {
                if c == '\n' {
                    break;
                }
            }
            continue;
        }

        let lexeme = match c {
            '(' => {
                cursor.bump();
                Lexeme::LParen
            }
            ')' => {
                cursor.bump();
                Lexeme::RParen
            }
            ',' => {
                cursor.bump();
                Lexeme::Comma
            }
            '.' => {
                cursor.bump();
                Lexeme::Dot
            }
            ':' => {
                cursor.bump();
                if cursor.peek() != Some('-') {
                    return Err(RuleBaseLoadError::at(line, column, LoadErrorKind::UnexpectedChar(':')));
                }
                cursor.bump();
                Lexeme::Neck
            }
            '\'' => {
                cursor.bump();
                Lexeme::Text(read_text(&mut cursor, line, column)?)
            }
            c if is_ident_char(c) => {
                let mut ident = String::new();
                while let Some(c) = cursor.peek().filter(|c| is_ident_char(*c)) {
                    ident.push(c);
                    cursor.bump();
                }
                if c.is_ascii_uppercase() || c == '_' {
                    Lexeme::Variable(ident)
                } else {
                    Lexeme::Ident(ident)
                }
            }
            other => {
                return Err(RuleBaseLoadError::at(line, column, LoadErrorKind::UnexpectedChar(other)));
            }
        };

        out.push(Spanned {
            lexeme,
            line,
            column,
        });
    }

    Ok(out)
}

fn read_text(cursor: &mut Cursor<'_>, line: usize, column: usize) -> RuleLoadResult<String> {
    let mut text = String::new();
    loop {
        match cursor.bump() {
            Some('\'') if cursor.peek() == Some('\'') => {
                cursor.bump();
                text.push('\'');
            }
            Some('\'') => return Ok(text),
            Some(c) => text.push(c),
            None => {
                return Err(RuleBaseLoadError::at(line, column, LoadErrorKind::UnterminatedText));
            }
        }
    }
}

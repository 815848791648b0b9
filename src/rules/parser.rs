//! Clause parser
//!
//! ```text
//! clause := goal [ ":-" goal { "," goal } ] "."
//! goal   := ident [ "(" term { "," term } ")" ]
//! term   := ident | variable | text
//! ```
//!
//! Compound terms are not part of the language.

use std::fmt;

use super::errors::{LoadErrorKind, RuleBaseLoadError, RuleLoadResult};
use super::lexer::{Lexeme, Spanned};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Atom(String),
    Var(String),
    Text(String),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(s) | Term::Var(s) => f.write_str(s),
            Term::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub name: String,
    pub args: Vec<Term>,
    pub line: usize,
    pub column: usize,
}

impl Goal {
    /// `name/arity`
    pub fn signature(&self) -> (&str, usize) {
        (self.name.as_str(), self.args.len())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A parsed clause. `body` is empty for facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub head: Goal,
    pub body: Vec<Goal>,
}

impl Clause {
    pub fn line(&self) -> usize {
        self.head.line
    }

    pub fn column(&self) -> usize {
        self.head.column
    }

    /// Error positioned at this clause and carrying its text.
    pub fn error(&self, kind: LoadErrorKind) -> RuleBaseLoadError {
        RuleBaseLoadError::at(self.line(), self.column(), kind).with_clause(self.to_string())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.body.is_empty() {
            f.write_str(" :- ")?;
            for (i, goal) in self.body.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", goal)?;
            }
        }
        f.write_str(".")
    }
}

struct Parser {
    lexemes: Vec<Spanned>,
    pos: usize,
    /// Position just past the last lexeme, for end-of-input errors
    end: (usize, usize),
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.lexemes.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let item = self.lexemes.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn error_here(&self, kind: LoadErrorKind) -> RuleBaseLoadError {
        let (line, column) = self
            .peek()
            .map(|s| (s.line, s.column))
            .unwrap_or(self.end);
        RuleBaseLoadError::at(line, column, kind)
    }

    fn clause(&mut self) -> RuleLoadResult<Clause> {
        let head = self.goal()?;
        let mut body = Vec::new();

        match self.next() {
            Some(Spanned { lexeme: Lexeme::Dot, .. }) => return Ok(Clause { head, body }),
            Some(Spanned { lexeme: Lexeme::Neck, .. }) => {}
            Some(Spanned { lexeme: Lexeme::RParen, line, column }) => {
                return Err(RuleBaseLoadError::at(line, column, LoadErrorKind::UnbalancedParenthesis));
            }
            Some(other) => {
                return Err(RuleBaseLoadError::at(
                    other.line,
                    other.column,
                    LoadErrorKind::Unexpected {
                        found: other.lexeme.to_string(),
                        expected: "':-' or '.'",
                    },
                ));
            }
            None => return Err(self.error_here(LoadErrorKind::MissingTerminator)),
        }

        loop {
            body.push(self.goal()?);
            match self.next() {
                Some(Spanned { lexeme: Lexeme::Comma, .. }) => continue,
                Some(Spanned { lexeme: Lexeme::Dot, .. }) => return Ok(Clause { head, body }),
                Some(Spanned { lexeme: Lexeme::RParen, line, column }) => {
                    return Err(RuleBaseLoadError::at(line, column, LoadErrorKind::UnbalancedParenthesis));
                }
                Some(other) => {
                    return Err(RuleBaseLoadError::at(
                        other.line,
                        other.column,
                        LoadErrorKind::Unexpected {
                            found: other.lexeme.to_string(),
                            expected: "',' or '.'",
                        },
                    ));
                }
                None => return Err(self.error_here(LoadErrorKind::MissingTerminator)),
            }
        }
    }

    fn goal(&mut self) -> RuleLoadResult<Goal> {
        let (name, line, column) = match self.next() {
            Some(Spanned { lexeme: Lexeme::Ident(name), line, column }) => (name, line, column),
            Some(Spanned { lexeme: Lexeme::RParen, line, column }) => {
                return Err(RuleBaseLoadError::at(line, column, LoadErrorKind::UnbalancedParenthesis));
            }
            Some(other) => {
                return Err(RuleBaseLoadError::at(
                    other.line,
                    other.column,
                    LoadErrorKind::Unexpected {
                        found: other.lexeme.to_string(),
                        expected: "predicate name",
                    },
                ));
            }
            None => return Err(self.error_here(LoadErrorKind::MissingTerminator)),
        };

        let mut args = Vec::new();
        if matches!(self.peek(), Some(Spanned { lexeme: Lexeme::LParen, .. })) {
            let open = self.next().map(|s| (s.line, s.column)).unwrap_or((line, column));
            let unbalanced = || RuleBaseLoadError::at(open.0, open.1, LoadErrorKind::UnbalancedParenthesis);

            loop {
                let term = match self.next() {
                    Some(Spanned { lexeme: Lexeme::Ident(s), .. }) => Term::Atom(s),
                    Some(Spanned { lexeme: Lexeme::Variable(s), .. }) => Term::Var(s),
                    Some(Spanned { lexeme: Lexeme::Text(s), .. }) => Term::Text(s),
                    Some(Spanned { lexeme: Lexeme::Dot, .. }) | None => return Err(unbalanced()),
                    Some(other) => {
                        return Err(RuleBaseLoadError::at(
                            other.line,
                            other.column,
                            LoadErrorKind::Unexpected {
                                found: other.lexeme.to_string(),
                                expected: "argument",
                            },
                        ));
                    }
                };
                args.push(term);

                match self.next() {
                    Some(Spanned { lexeme: Lexeme::Comma, .. }) => continue,
                    Some(Spanned { lexeme: Lexeme::RParen, .. }) => break,
                    Some(Spanned { lexeme: Lexeme::Dot, .. }) | None => return Err(unbalanced()),
                    Some(other) => {
                        return Err(RuleBaseLoadError::at(
                            other.line,
                            other.column,
                            LoadErrorKind::Unexpected {
                                found: other.lexeme.to_string(),
                                expected: "',' or ')'",
                            },
                        ));
                    }
                }
            }
        }

        Ok(Goal {
            name,
            args,
            line,
            column,
        })
    }
}

/// Parses every clause in `lexemes`, in source order.
pub fn parse(lexemes: Vec<Spanned>) -> RuleLoadResult<Vec<Clause>> {
    let end = lexemes
        .last()
        .map(|s| (s.line, s.column + 1))
        .unwrap_or((1, 1));
    let mut parser = Parser {
        lexemes,
        pos: 0,
        end,
    };

    let mut clauses = Vec::new();
    while parser.peek().is_some() {
        clauses.push(parser.clause()?);
    }
    Ok(clauses)
}

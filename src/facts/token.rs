//! Safe identifier tokens
//!
//! Grammar: `[A-Za-z0-9_]{1,64}`. Anything that could be read as clause
//! syntax (parentheses, commas, quotes, dots, whitespace) is refused.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use super::errors::{FactError, FactResult, InvalidTokenReason};

/// Maximum token length in bytes
pub const MAX_TOKEN_LEN: usize = 64;

/// What a token names. Used only for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Symptom,
    Allergy,
    AttributeKey,
    AttributeValue,
    Disease,
    Treatment,
    Warning,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Symptom => "symptom",
            TokenKind::Allergy => "allergy",
            TokenKind::AttributeKey => "attribute key",
            TokenKind::AttributeValue => "attribute value",
            TokenKind::Disease => "disease",
            TokenKind::Treatment => "treatment",
            TokenKind::Warning => "warning",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated identifier.
///
/// The only way to obtain a `Token` is [`Token::parse`], so holding one is
/// proof that the grammar was checked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Validates `raw` and wraps it.
    pub fn parse(kind: TokenKind, raw: &str) -> FactResult<Self> {
        if raw.is_empty() {
            return Err(FactError::invalid_token(kind, raw, InvalidTokenReason::Empty));
        }

        if let Some((offset, ch)) = raw
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(FactError::invalid_token(
                kind,
                raw,
                InvalidTokenReason::DisallowedChar { ch, offset },
            ));
        }

        // Only ASCII remains here, so byte length equals char count.
        if raw.len() > MAX_TOKEN_LEN {
            return Err(FactError::invalid_token(
                kind,
                raw,
                InvalidTokenReason::TooLong {
                    len: raw.len(),
                    max: MAX_TOKEN_LEN,
                },
            ));
        }

        Ok(Token(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

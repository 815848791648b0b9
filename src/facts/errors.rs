//! Fact error types
//!
//! Error codes:
//! - DROID_INVALID_TOKEN (REJECT)

use std::fmt;

use thiserror::Error;

use super::token::TokenKind;

/// Longest prefix of a rejected value echoed back in an error.
const PREVIEW_CHARS: usize = 32;

/// Why a raw string was refused as a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTokenReason {
    /// Empty string
    Empty,
    /// Character outside `[A-Za-z0-9_]`
    DisallowedChar {
        /// Offending character
        ch: char,
        /// Byte offset in the raw value
        offset: usize,
    },
    /// Longer than the token limit
    TooLong {
        /// Length in bytes
        len: usize,
        /// Maximum length in bytes
        max: usize,
    },
}

impl fmt::Display for InvalidTokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTokenReason::Empty => write!(f, "token is empty"),
            InvalidTokenReason::DisallowedChar { ch, offset } => {
                write!(f, "disallowed character {:?} at offset {}", ch, offset)
            }
            InvalidTokenReason::TooLong { len, max } => {
                write!(f, "token is {} bytes long (max {})", len, max)
            }
        }
    }
}

/// Errors raised while building facts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    /// A symptom, allergy or attribute identifier failed the token grammar.
    #[error("invalid {kind} token {value:?}: {reason}")]
    InvalidToken {
        kind: TokenKind,
        /// Truncated copy of the rejected input
        value: String,
        reason: InvalidTokenReason,
    },
}

impl FactError {
    pub(crate) fn invalid_token(kind: TokenKind, raw: &str, reason: InvalidTokenReason) -> Self {
        let mut value: String = raw.chars().take(PREVIEW_CHARS).collect();
        if raw.chars().count() > PREVIEW_CHARS {
            value.push_str("...");
        }
        FactError::InvalidToken {
            kind,
            value,
            reason,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FactError::InvalidToken { .. } => "DROID_INVALID_TOKEN",
        }
    }

    /// Returns the token kind that failed validation
    pub fn kind(&self) -> TokenKind {
        match self {
            FactError::InvalidToken { kind, .. } => *kind,
        }
    }

    /// Fact errors reject a single consultation; they are never fatal.
    pub fn is_fatal(&self) -> bool {
        false
    }
}

/// Result type for fact operations
pub type FactResult<T> = Result<T, FactError>;

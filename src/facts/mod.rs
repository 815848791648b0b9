//! Fact store for a single consultation
//!
//! Facts are typed values built only from validated tokens. A store is owned
//! by exactly one consultation and never shared between requests.
//!
//! # Design Principles
//!
//! - Tokens are validated before they become facts
//! - Set semantics: asserting the same fact twice is not observable
//! - Deterministic iteration order (BTree-backed)
//! - No global state

mod errors;
mod store;
mod token;

pub use errors::{FactError, FactResult, InvalidTokenReason};
pub use store::{Fact, FactStore, ALLERGY};
pub use token::{Token, TokenKind, MAX_TOKEN_LEN};

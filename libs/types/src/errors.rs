//! Error types for boundary record validation

use thiserror::Error;

/// Errors raised while constructing boundary records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Both sides of a pair name the same token
    #[error("Invalid pair: both tokens are {token}")]
    InvalidPair { token: String },

    /// Token identifier is empty
    #[error("Token identifier cannot be empty")]
    EmptyToken,

    /// Token is not one of the pair's two sides
    #[error("Token {token} is not part of pair {pair}")]
    TokenNotInPair { token: String, pair: String },
}

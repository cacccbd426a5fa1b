//! Token, pair and venue identifiers
//!
//! A pool's identity is the canonical (sorted) pair of its token identifiers,
//! so `(SOL, USDT)` and `(USDT, SOL)` always resolve to the same [`PairKey`].

use crate::errors::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token identifier (mint address, symbol, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Result<Self, TypesError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TypesError::EmptyToken);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TokenId {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenId> for String {
    fn from(token: TokenId) -> Self {
        token.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Swap direction relative to the canonical token order of a [`PairKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sell `token_a`, receive `token_b`
    AToB,
    /// Sell `token_b`, receive `token_a`
    BToA,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::AToB => Direction::BToA,
            Direction::BToA => Direction::AToB,
        }
    }

    /// Order `(a, b)` values as `(in, out)` for this direction
    pub fn orient<T>(self, a: T, b: T) -> (T, T) {
        match self {
            Direction::AToB => (a, b),
            Direction::BToA => (b, a),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::AToB => f.write_str("A->B"),
            Direction::BToA => f.write_str("B->A"),
        }
    }
}

/// Canonical unordered token pair; `token_a < token_b` always holds
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PairKeyRepr", into = "PairKeyRepr")]
pub struct PairKey {
    token_a: TokenId,
    token_b: TokenId,
}

/// Wire shape of a pair; canonicalised on the way in
#[derive(Serialize, Deserialize)]
struct PairKeyRepr {
    token_a: TokenId,
    token_b: TokenId,
}

impl TryFrom<PairKeyRepr> for PairKey {
    type Error = TypesError;

    fn try_from(repr: PairKeyRepr) -> Result<Self, Self::Error> {
        PairKey::new(repr.token_a, repr.token_b)
    }
}

impl From<PairKey> for PairKeyRepr {
    fn from(pair: PairKey) -> Self {
        Self {
            token_a: pair.token_a,
            token_b: pair.token_b,
        }
    }
}

impl PairKey {
    /// Build the canonical key for two tokens given in any order
    pub fn new(x: TokenId, y: TokenId) -> Result<Self, TypesError> {
        if x == y {
            return Err(TypesError::InvalidPair {
                token: x.to_string(),
            });
        }
        let (token_a, token_b) = if x < y { (x, y) } else { (y, x) };
        Ok(Self { token_a, token_b })
    }

    /// Convenience constructor from raw identifiers
    pub fn from_strs(x: &str, y: &str) -> Result<Self, TypesError> {
        Self::new(TokenId::new(x)?, TokenId::new(y)?)
    }

    pub fn token_a(&self) -> &TokenId {
        &self.token_a
    }

    pub fn token_b(&self) -> &TokenId {
        &self.token_b
    }

    /// Resolve the swap direction implied by selling `token_in`
    pub fn direction_from(&self, token_in: &TokenId) -> Result<Direction, TypesError> {
        if token_in == &self.token_a {
            Ok(Direction::AToB)
        } else if token_in == &self.token_b {
            Ok(Direction::BToA)
        } else {
            Err(TypesError::TokenNotInPair {
                token: token_in.to_string(),
                pair: self.to_string(),
            })
        }
    }

    /// `(token_in, token_out)` for a direction
    pub fn tokens_for(&self, direction: Direction) -> (&TokenId, &TokenId) {
        direction.orient(&self.token_a, &self.token_b)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_a, self.token_b)
    }
}

/// Identifier of a liquidity venue (the local ledger or a remote protocol)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

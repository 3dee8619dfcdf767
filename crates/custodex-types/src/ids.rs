//! Identifiers used throughout Custodex.
//!
//! Accounts use UUIDv7 for time-ordered lexicographic sorting. Order IDs are
//! plain integers allocated by the order book's monotonic counter: the book
//! is an append-only log addressable by ID, so IDs must be dense and strictly
//! increasing, never random.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Unique identifier for an account (a user of the exchange, the fee
/// collector, or the engine's own asset-ledger account).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// The nil account. Transfers to it are rejected by the asset ledger;
    /// it plays the role of the zero/invalid recipient address.
    pub const NIL: Self = Self(Uuid::nil());

    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Positive integer order identifier, strictly increasing by creation order.
///
/// Allocated exclusively by the order book; the first order gets ID 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// Type alias for asset identifiers (e.g., "DAPP", "mUSDC", "mLINK").
pub type Asset = String;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

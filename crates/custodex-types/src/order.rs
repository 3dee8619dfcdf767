//! Order types for the Custodex order book.
//!
//! An order is a maker's standing, **non-escrowed** offer to exchange one
//! custodied asset amount for another. The balance check at creation time is
//! point-in-time only; the committed funds stay withdrawable, and a fill
//! re-validates the maker's balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Asset, OrderId};

/// Lifecycle status of an order.
///
/// `Filled` and `Cancelled` are terminal: once reached, the order is
/// immutable forever. Orders are never deleted from the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A commitment to exchange `amount_give` of `asset_give` for `amount_get`
/// of `asset_get`, made by `maker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub maker: AccountId,
    /// The asset the maker wants to receive.
    pub asset_get: Asset,
    pub amount_get: Decimal,
    /// The asset the maker offers out of custody.
    pub asset_give: Asset,
    pub amount_give: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}

/// Test helpers.
#[cfg(test)]
impl Order {
    pub fn dummy(maker: AccountId, amount_get: Decimal, amount_give: Decimal) -> Self {
        Self {
            id: OrderId(1),
            maker,
            asset_get: "mUSDC".to_string(),
            amount_get,
            asset_give: "DAPP".to_string(),
            amount_give,
            status: OrderStatus::Open,
            created_at: Utc::now(),
        }
    }
}

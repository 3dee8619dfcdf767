//! Audit events for the Custodex engine.
//!
//! Every mutating operation that commits emits exactly one [`ExchangeEvent`]
//! recording the before/after-relevant quantities. Aborted operations emit
//! nothing. Events form an append-only audit trail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Asset, Order, OrderId};

/// One audit event per committed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    /// Funds pulled from the asset ledger into custody.
    Deposit {
        asset: Asset,
        account: AccountId,
        amount: Decimal,
        /// The account's custody balance after the deposit.
        balance: Decimal,
    },
    /// Funds pushed from custody back out to the asset ledger.
    Withdraw {
        asset: Asset,
        account: AccountId,
        amount: Decimal,
        /// The account's custody balance after the withdrawal.
        balance: Decimal,
    },
    /// A new open order was appended to the book.
    OrderCreated { order: Order },
    /// An open order was cancelled by its maker.
    OrderCancelled {
        id: OrderId,
        maker: AccountId,
        asset_get: Asset,
        amount_get: Decimal,
        asset_give: Asset,
        amount_give: Decimal,
        cancelled_at: DateTime<Utc>,
    },
    /// An open order was filled by a counterparty.
    OrderFilled {
        id: OrderId,
        filler: AccountId,
        maker: AccountId,
        asset_get: Asset,
        amount_get: Decimal,
        asset_give: Asset,
        amount_give: Decimal,
        /// Fee paid by the filler in `asset_get`, credited to the fee account.
        fee: Decimal,
        filled_at: DateTime<Utc>,
    },
    /// A flash loan was issued and repaid within one operation.
    FlashLoan {
        asset: Asset,
        amount: Decimal,
        /// Loan fee retained by the engine's float (zero unless configured).
        fee: Decimal,
        recipient: AccountId,
        issued_at: DateTime<Utc>,
    },
}

impl ExchangeEvent {
    /// Short uppercase tag for logs and displays.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "DEPOSIT",
            Self::Withdraw { .. } => "WITHDRAW",
            Self::OrderCreated { .. } => "ORDER_CREATED",
            Self::OrderCancelled { .. } => "ORDER_CANCELLED",
            Self::OrderFilled { .. } => "ORDER_FILLED",
            Self::FlashLoan { .. } => "FLASH_LOAN",
        }
    }
}

impl std::fmt::Display for ExchangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

//! Error types for the Custodex exchange engine.
//!
//! All errors use the `CX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Balance errors
//! - 3xx: Asset ledger errors
//! - 4xx: Flash loan errors
//! - 9xx: Invariant violations
//!
//! Every error is synchronous and terminates the triggering operation with
//! zero persisted side effects. Nothing is retried or recovered internally.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Asset, OrderId, OrderStatus};

/// Central error enum for all Custodex operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The requested order does not exist in the book.
    #[error("CX_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The caller is not the order's maker.
    #[error("CX_ERR_101: Unauthorized: caller is not the maker of {0}")]
    Unauthorized(OrderId),

    /// The order is not open (already filled or cancelled).
    #[error("CX_ERR_102: Order {id} is {status}, not OPEN")]
    InvalidOrderState { id: OrderId, status: OrderStatus },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Custody or asset-ledger balance too low for the requested movement.
    #[error("CX_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A delegated transfer exceeds the approved amount.
    #[error("CX_ERR_201: Insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: Decimal, approved: Decimal },

    /// A zero or negative amount where a positive amount is required.
    #[error("CX_ERR_202: Invalid amount: {0}")]
    InvalidAmount(Decimal),

    // =================================================================
    // Asset Ledger Errors (3xx)
    // =================================================================
    /// Transfer or approval targeting the nil account.
    #[error("CX_ERR_300: Invalid recipient: nil account")]
    InvalidRecipient,

    /// Operation on an asset the ledger has never registered.
    #[error("CX_ERR_301: Unknown asset: {0}")]
    UnknownAsset(Asset),

    /// Registration of an asset symbol that already exists.
    #[error("CX_ERR_302: Asset already registered: {0}")]
    AssetAlreadyRegistered(Asset),

    // =================================================================
    // Flash Loan Errors (4xx)
    // =================================================================
    /// Flash loan requested exceeds the engine's on-hand holdings.
    #[error("CX_ERR_400: Insufficient funds to loan: requested {requested}, on hand {available}")]
    InsufficientLoanFunds {
        requested: Decimal,
        available: Decimal,
    },

    /// The flash-loan recipient failed to restore the required balance.
    #[error("CX_ERR_401: Repayment shortfall: required {required}, returned {returned}")]
    RepaymentShortfall { required: Decimal, returned: Decimal },

    // =================================================================
    // Invariant Errors (9xx)
    // =================================================================
    /// Custody total for an asset exceeds the engine's on-hand holdings.
    /// Critical safety alert.
    #[error(
        "CX_ERR_900: Solvency violation for {asset}: custody total {custody_total} \
         exceeds on-hand holdings {on_hand}"
    )]
    SolvencyViolation {
        asset: Asset,
        custody_total: Decimal,
        on_hand: Decimal,
    },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ExchangeError>;

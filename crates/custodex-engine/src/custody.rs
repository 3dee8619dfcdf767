//! Custody balance tracking.
//!
//! Tracks, per (account, asset) pair, the amount the exchange holds on the
//! account's behalf. The custody ledger is the source of truth for every
//! balance the engine moves internally; only deposits and withdrawals cross
//! the boundary to the external asset ledger.
//!
//! There is no frozen/escrow column: open orders are advisory commitments,
//! and committed funds stay spendable until a fill actually settles.

use std::collections::HashMap;

use custodex_types::{AccountId, Asset, ExchangeError, Result};
use rust_decimal::Decimal;

/// Per-(account, asset) custody balances.
///
/// All mutations are atomic: either the full operation succeeds or the
/// ledger is unchanged.
#[derive(Debug, Default)]
pub struct CustodyLedger {
    balances: HashMap<(AccountId, Asset), Decimal>,
}

impl CustodyLedger {
    /// Create a new empty custody ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit `account`'s custody entry for `asset` by `amount`.
    pub fn credit(&mut self, account: AccountId, asset: &str, amount: Decimal) {
        *self
            .balances
            .entry((account, asset.to_string()))
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Debit `account`'s custody entry for `asset` by `amount`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the entry is below `amount`;
    /// the entry is unchanged on failure.
    pub fn debit(&mut self, account: AccountId, asset: &str, amount: Decimal) -> Result<()> {
        let available = self.balance(account, asset);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances
            .insert((account, asset.to_string()), available - amount);
        Ok(())
    }

    /// Reverse a credit applied earlier in the same operation.
    ///
    /// Bypasses the balance check; callers guarantee the entry still holds
    /// at least `amount` because nothing else ran since the credit.
    pub(crate) fn revert_credit(&mut self, account: AccountId, asset: &str, amount: Decimal) {
        if let Some(entry) = self.balances.get_mut(&(account, asset.to_string())) {
            *entry -= amount;
        }
    }

    /// The custody entry for (`account`, `asset`). Zero if absent.
    #[must_use]
    pub fn balance(&self, account: AccountId, asset: &str) -> Decimal {
        self.balances
            .get(&(account, asset.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all accounts' custody entries for `asset`.
    ///
    /// The engine's solvency invariant compares this against its on-hand
    /// asset-ledger holdings.
    #[must_use]
    pub fn asset_total(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

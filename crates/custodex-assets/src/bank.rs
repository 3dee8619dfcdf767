//! In-memory multi-asset fungible ledger.
//!
//! Each registered asset carries its own balance and allowance tables.
//! All mutations are atomic: either the full operation succeeds or the
//! ledger is unchanged.

use std::collections::HashMap;

use custodex_types::{AccountId, Asset, ExchangeError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable metadata captured at asset registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMeta {
    /// Human-readable name (e.g., "Dapp University").
    pub name: String,
    /// Smallest-unit scale (e.g., 18).
    pub decimals: u32,
    /// Fixed supply minted to the issuer at registration.
    pub total_supply: Decimal,
}

/// Balance and allowance state for a single asset.
#[derive(Debug, Clone)]
struct AssetBook {
    meta: AssetMeta,
    balances: HashMap<AccountId, Decimal>,
    /// (owner, spender) → remaining approved amount.
    allowances: HashMap<(AccountId, AccountId), Decimal>,
}

/// A point-in-time copy of one asset's balances and allowances.
///
/// Produced by [`AssetBank::snapshot`] and consumed by [`AssetBank::restore`];
/// used by the engine to make the whole flash-loan body all-or-nothing.
#[derive(Debug, Clone)]
pub struct AssetSnapshot {
    asset: Asset,
    balances: HashMap<AccountId, Decimal>,
    allowances: HashMap<(AccountId, AccountId), Decimal>,
}

/// In-memory multi-asset ledger with transfer / approve / delegated-transfer
/// semantics per asset.
#[derive(Debug, Default)]
pub struct AssetBank {
    assets: HashMap<Asset, AssetBook>,
}

impl AssetBank {
    /// Create an empty bank with no registered assets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Register a new asset and mint its full supply to the issuer.
    ///
    /// # Errors
    /// - `AssetAlreadyRegistered` if the symbol is taken
    /// - `InvalidRecipient` if the issuer is the nil account
    /// - `InvalidAmount` if the supply is negative
    pub fn register(
        &mut self,
        asset: &str,
        name: &str,
        decimals: u32,
        total_supply: Decimal,
        issuer: AccountId,
    ) -> Result<()> {
        if self.assets.contains_key(asset) {
            return Err(ExchangeError::AssetAlreadyRegistered(asset.to_string()));
        }
        if issuer.is_nil() {
            return Err(ExchangeError::InvalidRecipient);
        }
        if total_supply < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(total_supply));
        }

        let mut balances = HashMap::new();
        balances.insert(issuer, total_supply);
        self.assets.insert(
            asset.to_string(),
            AssetBook {
                meta: AssetMeta {
                    name: name.to_string(),
                    decimals,
                    total_supply,
                },
                balances,
                allowances: HashMap::new(),
            },
        );

        tracing::debug!(asset, %total_supply, issuer = %issuer, "Asset registered");
        Ok(())
    }

    /// The balance of `account` in `asset`. Zero for unknown assets/accounts.
    #[must_use]
    pub fn balance_of(&self, asset: &str, account: AccountId) -> Decimal {
        self.assets
            .get(asset)
            .and_then(|book| book.balances.get(&account))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The fixed total supply of `asset`. Zero for unknown assets.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Decimal {
        self.assets
            .get(asset)
            .map(|book| book.meta.total_supply)
            .unwrap_or(Decimal::ZERO)
    }

    /// Registration metadata for `asset`, if registered.
    #[must_use]
    pub fn meta(&self, asset: &str) -> Option<&AssetMeta> {
        self.assets.get(asset).map(|book| &book.meta)
    }

    /// Whether `asset` has been registered.
    #[must_use]
    pub fn is_registered(&self, asset: &str) -> bool {
        self.assets.contains_key(asset)
    }

    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    /// - `UnknownAsset` if the asset is not registered
    /// - `InvalidRecipient` if `to` is the nil account
    /// - `InvalidAmount` if the amount is negative
    /// - `InsufficientBalance` if `from` holds less than `amount`
    pub fn transfer(
        &mut self,
        asset: &str,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let book = self
            .assets
            .get_mut(asset)
            .ok_or_else(|| ExchangeError::UnknownAsset(asset.to_string()))?;
        Self::move_balance(book, from, to, amount)
    }

    /// Approve `spender` to move up to `amount` of `asset` on behalf of
    /// `owner`. Overwrites any previous approval.
    ///
    /// # Errors
    /// - `UnknownAsset` if the asset is not registered
    /// - `InvalidRecipient` if `spender` is the nil account
    /// - `InvalidAmount` if the amount is negative
    pub fn approve(
        &mut self,
        asset: &str,
        owner: AccountId,
        spender: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let book = self
            .assets
            .get_mut(asset)
            .ok_or_else(|| ExchangeError::UnknownAsset(asset.to_string()))?;
        if spender.is_nil() {
            return Err(ExchangeError::InvalidRecipient);
        }
        if amount < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }
        book.allowances.insert((owner, spender), amount);
        Ok(())
    }

    /// The amount `spender` may still move on behalf of `owner`.
    #[must_use]
    pub fn allowance(&self, asset: &str, owner: AccountId, spender: AccountId) -> Decimal {
        self.assets
            .get(asset)
            .and_then(|book| book.allowances.get(&(owner, spender)))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Move `amount` of `asset` from `from` to `to` on behalf of `spender`,
    /// consuming `spender`'s allowance from `from`.
    ///
    /// # Errors
    /// - `UnknownAsset` if the asset is not registered
    /// - `InsufficientAllowance` if the approved amount is below `amount`
    /// - plus every failure mode of [`AssetBank::transfer`]
    pub fn transfer_from(
        &mut self,
        asset: &str,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let book = self
            .assets
            .get_mut(asset)
            .ok_or_else(|| ExchangeError::UnknownAsset(asset.to_string()))?;

        let approved = book
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or(Decimal::ZERO);
        if approved < amount {
            return Err(ExchangeError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }

        Self::move_balance(book, from, to, amount)?;

        // Only consume the allowance once the transfer has committed.
        book.allowances.insert((from, spender), approved - amount);
        Ok(())
    }

    /// Capture one asset's balances and allowances.
    ///
    /// # Errors
    /// Returns `UnknownAsset` if the asset is not registered.
    pub fn snapshot(&self, asset: &str) -> Result<AssetSnapshot> {
        let book = self
            .assets
            .get(asset)
            .ok_or_else(|| ExchangeError::UnknownAsset(asset.to_string()))?;
        Ok(AssetSnapshot {
            asset: asset.to_string(),
            balances: book.balances.clone(),
            allowances: book.allowances.clone(),
        })
    }

    /// Restore one asset's balances and allowances from a snapshot,
    /// discarding every change made since it was taken.
    ///
    /// # Errors
    /// Returns `UnknownAsset` if the asset is no longer registered.
    pub fn restore(&mut self, snapshot: AssetSnapshot) -> Result<()> {
        let book = self
            .assets
            .get_mut(&snapshot.asset)
            .ok_or(ExchangeError::UnknownAsset(snapshot.asset))?;
        book.balances = snapshot.balances;
        book.allowances = snapshot.allowances;
        Ok(())
    }

    fn move_balance(
        book: &mut AssetBook,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        if to.is_nil() {
            return Err(ExchangeError::InvalidRecipient);
        }
        if amount < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        let available = book.balances.get(&from).copied().unwrap_or(Decimal::ZERO);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        book.balances.insert(from, available - amount);
        *book.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

    fn setup() -> (AssetBank, AccountId) {
        let mut bank = AssetBank::new();
        let issuer = AccountId::new();
        bank.register("DAPP", "Dapp University", 18, SUPPLY, issuer)
            .unwrap();
        (bank, issuer)
    }

    #[test]
    fn register_mints_supply_to_issuer() {
        let (bank, issuer) = setup();
        assert_eq!(bank.balance_of("DAPP", issuer), SUPPLY);
        assert_eq!(bank.total_supply("DAPP"), SUPPLY);
        let meta = bank.meta("DAPP").unwrap();
        assert_eq!(meta.name, "Dapp University");
        assert_eq!(meta.decimals, 18);
    }

    #[test]
    fn duplicate_registration_fails() {
        let (mut bank, issuer) = setup();
        let err = bank
            .register("DAPP", "Other", 18, Decimal::ONE, issuer)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::AssetAlreadyRegistered(_)));
    }

    #[test]
    fn transfer_moves_balance() {
        let (mut bank, issuer) = setup();
        let user = AccountId::new();
        bank.transfer("DAPP", issuer, user, Decimal::new(100, 0))
            .unwrap();
        assert_eq!(bank.balance_of("DAPP", user), Decimal::new(100, 0));
        assert_eq!(
            bank.balance_of("DAPP", issuer),
            SUPPLY - Decimal::new(100, 0)
        );
    }

    #[test]
    fn transfer_insufficient_balance_fails() {
        let (mut bank, issuer) = setup();
        let pauper = AccountId::new();
        let err = bank
            .transfer("DAPP", pauper, issuer, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));
        // Ledger unchanged
        assert_eq!(bank.balance_of("DAPP", issuer), SUPPLY);
    }

    #[test]
    fn transfer_to_nil_rejected() {
        let (mut bank, issuer) = setup();
        let err = bank
            .transfer("DAPP", issuer, AccountId::NIL, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidRecipient));
    }

    #[test]
    fn transfer_unknown_asset_fails() {
        let (mut bank, issuer) = setup();
        let err = bank
            .transfer("mLINK", issuer, AccountId::new(), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::UnknownAsset(_)));
    }

    #[test]
    fn approve_then_transfer_from() {
        let (mut bank, issuer) = setup();
        let spender = AccountId::new();
        let dest = AccountId::new();

        bank.approve("DAPP", issuer, spender, Decimal::new(500, 0))
            .unwrap();
        assert_eq!(
            bank.allowance("DAPP", issuer, spender),
            Decimal::new(500, 0)
        );

        bank.transfer_from("DAPP", spender, issuer, dest, Decimal::new(200, 0))
            .unwrap();

        assert_eq!(bank.balance_of("DAPP", dest), Decimal::new(200, 0));
        // Allowance reduced by the spent amount
        assert_eq!(
            bank.allowance("DAPP", issuer, spender),
            Decimal::new(300, 0)
        );
    }

    #[test]
    fn transfer_from_exceeding_allowance_fails() {
        let (mut bank, issuer) = setup();
        let spender = AccountId::new();
        bank.approve("DAPP", issuer, spender, Decimal::new(100, 0))
            .unwrap();

        let err = bank
            .transfer_from("DAPP", spender, issuer, AccountId::new(), Decimal::new(101, 0))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientAllowance { .. }));
        // Allowance untouched on failure
        assert_eq!(
            bank.allowance("DAPP", issuer, spender),
            Decimal::new(100, 0)
        );
    }

    #[test]
    fn transfer_from_without_approval_fails() {
        let (mut bank, issuer) = setup();
        let err = bank
            .transfer_from(
                "DAPP",
                AccountId::new(),
                issuer,
                AccountId::new(),
                Decimal::ONE,
            )
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientAllowance { .. }));
    }

    #[test]
    fn transfer_from_insufficient_balance_keeps_allowance() {
        let (mut bank, _issuer) = setup();
        let owner = AccountId::new();
        let spender = AccountId::new();
        bank.approve("DAPP", owner, spender, Decimal::new(100, 0))
            .unwrap();

        let err = bank
            .transfer_from("DAPP", spender, owner, AccountId::new(), Decimal::new(50, 0))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));
        assert_eq!(bank.allowance("DAPP", owner, spender), Decimal::new(100, 0));
    }

    #[test]
    fn negative_amounts_rejected() {
        let (mut bank, issuer) = setup();
        let err = bank
            .transfer("DAPP", issuer, AccountId::new(), Decimal::new(-1, 0))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidAmount(_)));
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let (mut bank, issuer) = setup();
        let user = AccountId::new();
        let spender = AccountId::new();
        bank.transfer("DAPP", issuer, user, Decimal::new(100, 0))
            .unwrap();
        bank.approve("DAPP", user, spender, Decimal::new(10, 0))
            .unwrap();

        let snap = bank.snapshot("DAPP").unwrap();

        bank.transfer("DAPP", user, issuer, Decimal::new(100, 0))
            .unwrap();
        bank.approve("DAPP", user, spender, Decimal::ZERO).unwrap();
        assert_eq!(bank.balance_of("DAPP", user), Decimal::ZERO);

        bank.restore(snap).unwrap();
        assert_eq!(bank.balance_of("DAPP", user), Decimal::new(100, 0));
        assert_eq!(bank.allowance("DAPP", user, spender), Decimal::new(10, 0));
    }

    #[test]
    fn asset_meta_serde_roundtrip() {
        let (bank, _) = setup();
        let meta = bank.meta("DAPP").unwrap();
        let json = serde_json::to_string(meta).unwrap();
        let back: AssetMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(*meta, back);
    }

    #[test]
    fn multiple_assets_are_independent() {
        let (mut bank, issuer) = setup();
        let other_issuer = AccountId::new();
        bank.register("mUSDC", "Mock USDC", 18, SUPPLY, other_issuer)
            .unwrap();

        bank.transfer("mUSDC", other_issuer, issuer, Decimal::new(5, 0))
            .unwrap();
        assert_eq!(bank.balance_of("DAPP", issuer), SUPPLY);
        assert_eq!(bank.balance_of("mUSDC", issuer), Decimal::new(5, 0));
    }
}

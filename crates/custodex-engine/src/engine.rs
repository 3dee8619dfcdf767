//! The exchange engine facade.
//!
//! One `Exchange` instance owns the custody ledger, the order book, and the
//! audit log. The asset ledger is a separate collaborator passed `&mut` into
//! the operations that touch it. Each public operation either commits fully
//! (mutations applied, one audit event recorded) or aborts with a typed
//! error and zero persisted side effects.
//!
//! Ordering discipline: internal ledger mutations are applied strictly
//! before any call into a collaborator that could act on the ledger
//! (checks-effects-interactions), so a nested call observes consistent,
//! already-updated state.

use custodex_assets::AssetBank;
use custodex_types::{
    AccountId, ExchangeConfig, ExchangeError, ExchangeEvent, Order, OrderId, Result,
};
use rust_decimal::Decimal;

use crate::audit::EventLog;
use crate::book::OrderBook;
use crate::custody::CustodyLedger;
use crate::flash::FlashLoanReceiver;

/// Custodial exchange engine.
pub struct Exchange {
    /// The engine's own asset-ledger account: deposits land here, and
    /// on-hand holdings are this account's balances.
    account: AccountId,
    config: ExchangeConfig,
    custody: CustodyLedger,
    book: OrderBook,
    audit: EventLog,
}

impl Exchange {
    /// Create an engine with the given fee configuration and a fresh
    /// asset-ledger account.
    #[must_use]
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            account: AccountId::new(),
            config,
            custody: CustodyLedger::new(),
            book: OrderBook::new(),
            audit: EventLog::new(),
        }
    }

    // =====================================================================
    // Custody ledger operations
    // =====================================================================

    /// Pull `amount` of `asset` from `account`'s asset-ledger balance into
    /// custody. The account must have approved the engine for at least
    /// `amount` beforehand.
    ///
    /// Returns the account's new custody balance.
    ///
    /// # Errors
    /// - `InvalidAmount` unless `amount > 0`
    /// - the asset ledger's failures verbatim (`InsufficientAllowance`,
    ///   `InsufficientBalance`, `UnknownAsset`)
    pub fn deposit(
        &mut self,
        bank: &mut AssetBank,
        asset: &str,
        account: AccountId,
        amount: Decimal,
    ) -> Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        bank.transfer_from(asset, self.account, account, self.account, amount)?;
        self.custody.credit(account, asset, amount);

        let balance = self.custody.balance(account, asset);
        self.audit.record(ExchangeEvent::Deposit {
            asset: asset.to_string(),
            account,
            amount,
            balance,
        });
        tracing::info!(asset, account = %account, %amount, %balance, "Deposit");
        Ok(balance)
    }

    /// Push `amount` of `asset` from custody back out to `account`'s
    /// asset-ledger balance.
    ///
    /// Returns the account's new custody balance.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientBalance` if the custody entry is below `amount`
    pub fn withdraw(
        &mut self,
        bank: &mut AssetBank,
        asset: &str,
        account: AccountId,
        amount: Decimal,
    ) -> Result<Decimal> {
        if amount < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        // Debit before the outbound transfer: a nested call back into the
        // engine must observe the already-reduced entry.
        self.custody.debit(account, asset, amount)?;
        if let Err(err) = bank.transfer(asset, self.account, account, amount) {
            self.custody.credit(account, asset, amount);
            return Err(err);
        }

        let balance = self.custody.balance(account, asset);
        self.audit.record(ExchangeEvent::Withdraw {
            asset: asset.to_string(),
            account,
            amount,
            balance,
        });
        tracing::info!(asset, account = %account, %amount, %balance, "Withdrawal");
        Ok(balance)
    }

    /// The custody balance the engine holds for (`asset`, `account`).
    /// Zero if absent.
    #[must_use]
    pub fn total_balance_of(&self, asset: &str, account: AccountId) -> Decimal {
        self.custody.balance(account, asset)
    }

    // =====================================================================
    // Order book operations
    // =====================================================================

    /// Create an order committing `maker` to give `amount_give` of
    /// `asset_give` for `amount_get` of `asset_get`.
    ///
    /// The balance check is point-in-time only: nothing is escrowed, and the
    /// maker may withdraw the committed funds afterwards, leaving the order
    /// unfillable until topped back up. Fills re-validate.
    ///
    /// # Errors
    /// - `InvalidAmount` if either amount is negative
    /// - `InsufficientBalance` if the maker's `asset_give` custody entry is
    ///   below `amount_give` right now
    pub fn make_order(
        &mut self,
        maker: AccountId,
        asset_get: &str,
        amount_get: Decimal,
        asset_give: &str,
        amount_give: Decimal,
    ) -> Result<Order> {
        if amount_get < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount_get));
        }
        if amount_give < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount_give));
        }

        let available = self.custody.balance(maker, asset_give);
        if available < amount_give {
            return Err(ExchangeError::InsufficientBalance {
                needed: amount_give,
                available,
            });
        }

        let order = self
            .book
            .append(maker, asset_get, amount_get, asset_give, amount_give);
        self.audit.record(ExchangeEvent::OrderCreated {
            order: order.clone(),
        });
        tracing::info!(
            id = order.id.0,
            maker = %maker,
            asset_get,
            %amount_get,
            asset_give,
            %amount_give,
            "Order created"
        );
        Ok(order)
    }

    /// Cancel an open order. Only the maker may cancel, and only while the
    /// order is open. No ledger movement occurs.
    ///
    /// # Errors
    /// - `OrderNotFound` / `InvalidOrderState` / `Unauthorized`
    pub fn cancel_order(&mut self, caller: AccountId, id: OrderId) -> Result<Order> {
        let order = self.book.cancel(caller, id)?;
        self.audit.record(ExchangeEvent::OrderCancelled {
            id: order.id,
            maker: order.maker,
            asset_get: order.asset_get.clone(),
            amount_get: order.amount_get,
            asset_give: order.asset_give.clone(),
            amount_give: order.amount_give,
            cancelled_at: chrono::Utc::now(),
        });
        tracing::info!(id = order.id.0, maker = %order.maker, "Order cancelled");
        Ok(order)
    }

    /// Fill an open order on behalf of `filler`.
    ///
    /// The filler pays `amount_get` plus the percentage fee in `asset_get`;
    /// the maker receives `amount_get`, the fee account receives the fee,
    /// and the filler receives `amount_give` out of the maker's custody.
    /// If the maker's give-side balance has dropped below `amount_give`
    /// since the order was created, the whole fill is unwound.
    ///
    /// # Errors
    /// - `OrderNotFound` / `InvalidOrderState`
    /// - `InsufficientBalance` from either the filler's or the maker's side
    pub fn fill_order(&mut self, filler: AccountId, id: OrderId) -> Result<Order> {
        let order = self.book.open_order(id)?.clone();
        let fee = self.config.fill_fee(order.amount_get);
        let cost = order.amount_get + fee;

        self.custody.debit(filler, &order.asset_get, cost)?;
        self.custody
            .credit(order.maker, &order.asset_get, order.amount_get);
        self.custody
            .credit(self.config.fee_account, &order.asset_get, fee);

        // The creation-time check was advisory; the maker may have withdrawn
        // the committed funds since. Unwind the three moves above if so.
        if let Err(err) = self
            .custody
            .debit(order.maker, &order.asset_give, order.amount_give)
        {
            self.custody
                .revert_credit(self.config.fee_account, &order.asset_get, fee);
            self.custody
                .revert_credit(order.maker, &order.asset_get, order.amount_get);
            self.custody.credit(filler, &order.asset_get, cost);
            tracing::warn!(
                id = order.id.0,
                maker = %order.maker,
                asset_give = %order.asset_give,
                "Fill rejected: maker no longer covers the committed amount"
            );
            return Err(err);
        }
        self.custody
            .credit(filler, &order.asset_give, order.amount_give);

        let order = self.book.mark_filled(id)?;
        let filled_at = chrono::Utc::now();
        self.audit.record(ExchangeEvent::OrderFilled {
            id: order.id,
            filler,
            maker: order.maker,
            asset_get: order.asset_get.clone(),
            amount_get: order.amount_get,
            asset_give: order.asset_give.clone(),
            amount_give: order.amount_give,
            fee,
            filled_at,
        });
        tracing::info!(
            id = order.id.0,
            filler = %filler,
            maker = %order.maker,
            %fee,
            "Order filled"
        );
        Ok(order)
    }

    /// Number of orders ever created.
    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.book.count()
    }

    /// Look up an order by ID. Terminal orders stay addressable forever.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.book.get(id)
    }

    /// All orders in creation order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.book.iter()
    }

    // =====================================================================
    // Flash loans
    // =====================================================================

    /// Lend `amount` of `asset` out of the engine's on-hand holdings to
    /// `recipient` for the duration of its callback.
    ///
    /// The recipient must restore the engine's holdings to at least their
    /// prior level plus the configured loan fee before the callback returns;
    /// otherwise the asset's entire ledger state is rolled back to the
    /// pre-loan snapshot and the call fails, as if nothing ever executed.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientLoanFunds` if on-hand holdings are below `amount`
    ///   (checked before any transfer)
    /// - `RepaymentShortfall` if the post-callback balance check fails
    pub fn flash_loan(
        &mut self,
        bank: &mut AssetBank,
        recipient: &mut dyn FlashLoanReceiver,
        asset: &str,
        amount: Decimal,
        data: &[u8],
    ) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        let balance_before = bank.balance_of(asset, self.account);
        if balance_before < amount {
            return Err(ExchangeError::InsufficientLoanFunds {
                requested: amount,
                available: balance_before,
            });
        }

        // Everything from the transfer-out through the callback happens
        // inside this snapshot's scope.
        let snapshot = bank.snapshot(asset)?;

        bank.transfer(asset, self.account, recipient.account(), amount)?;
        recipient.on_flash_loan(bank, asset, amount, data);

        let fee = self.config.loan_fee(amount);
        let required = balance_before + fee;
        let returned = bank.balance_of(asset, self.account);
        if returned < required {
            bank.restore(snapshot)?;
            tracing::warn!(
                asset,
                %amount,
                %required,
                %returned,
                recipient = %recipient.account(),
                "Flash loan rolled back: repayment shortfall"
            );
            return Err(ExchangeError::RepaymentShortfall { required, returned });
        }

        self.audit.record(ExchangeEvent::FlashLoan {
            asset: asset.to_string(),
            amount,
            fee,
            recipient: recipient.account(),
            issued_at: chrono::Utc::now(),
        });
        tracing::info!(asset, %amount, %fee, recipient = %recipient.account(), "Flash loan");
        Ok(())
    }

    // =====================================================================
    // Reads and invariants
    // =====================================================================

    /// The account credited with fill fees.
    #[must_use]
    pub fn fee_account(&self) -> AccountId {
        self.config.fee_account
    }

    /// The fill fee percentage.
    #[must_use]
    pub fn fee_percent(&self) -> u32 {
        self.config.fee_percent
    }

    /// The flash-loan fee percentage (zero when disabled).
    #[must_use]
    pub fn loan_fee_percent(&self) -> u32 {
        self.config.loan_fee_percent
    }

    /// The engine's own asset-ledger account. Users approve this account as
    /// spender before depositing; on-hand holdings are its balances.
    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// The engine's fee configuration.
    #[must_use]
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// The audit log of every committed operation.
    #[must_use]
    pub fn event_log(&self) -> &EventLog {
        &self.audit
    }

    /// The committed audit events in order.
    pub fn events(&self) -> impl Iterator<Item = &ExchangeEvent> {
        self.audit.events()
    }

    /// Check that the custody total for `asset` does not exceed the
    /// engine's on-hand holdings.
    ///
    /// Holds after every committed operation; it may only be violated
    /// transiently inside a flash loan, between the transfer-out and the
    /// post-callback check.
    ///
    /// # Errors
    /// Returns `SolvencyViolation` with both quantities if the invariant is
    /// broken.
    pub fn verify_solvency(&self, bank: &AssetBank, asset: &str) -> Result<()> {
        let custody_total = self.custody.asset_total(asset);
        let on_hand = bank.balance_of(asset, self.account);
        if custody_total > on_hand {
            return Err(ExchangeError::SolvencyViolation {
                asset: asset.to_string(),
                custody_total,
                on_hand,
            });
        }
        Ok(())
    }
}

//! Flash-loan recipient interface.
//!
//! A flash loan lends custodied asset inventory to a recipient within one
//! atomic engine operation. The recipient is an opaque collaborator behind a
//! single callback: it receives the funds, does whatever it wants with the
//! asset ledger, and must have restored the engine's holdings (plus any
//! configured fee) by the time the callback returns.

use custodex_assets::AssetBank;
use custodex_types::AccountId;
use rust_decimal::Decimal;

/// Capability interface a flash-loan recipient must implement.
///
/// The callback's return value conveys nothing — success is judged solely by
/// the engine's post-callback balance check, and a shortfall undoes the
/// entire operation including the initial transfer-out.
pub trait FlashLoanReceiver {
    /// The asset-ledger account the loan principal is transferred to.
    fn account(&self) -> AccountId;

    /// Invoked mid-operation, after `amount` of `asset` has already been
    /// transferred to [`FlashLoanReceiver::account`]. `data` is the opaque
    /// payload the borrower passed to `flash_loan`.
    fn on_flash_loan(&mut self, bank: &mut AssetBank, asset: &str, amount: Decimal, data: &[u8]);
}

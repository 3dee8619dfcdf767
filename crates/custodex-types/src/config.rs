//! Engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AccountId};

/// Fee configuration for an exchange instance.
///
/// Fixed at engine construction and immutable for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// The account credited with the percentage fee on every order fill.
    pub fee_account: AccountId,
    /// Integer percentage applied to the taker's payment on each fill,
    /// truncating toward zero.
    pub fee_percent: u32,
    /// Integer percentage charged on flash loans. Zero disables the loan fee.
    pub loan_fee_percent: u32,
}

impl ExchangeConfig {
    /// Config with the given fee account and fill fee, no loan fee.
    #[must_use]
    pub fn new(fee_account: AccountId, fee_percent: u32) -> Self {
        Self {
            fee_account,
            fee_percent,
            loan_fee_percent: 0,
        }
    }

    /// Same config with a flash-loan fee enabled.
    #[must_use]
    pub fn with_loan_fee(mut self, loan_fee_percent: u32) -> Self {
        self.loan_fee_percent = loan_fee_percent;
        self
    }

    /// The reference deployment: 10% fill fee, no loan fee.
    #[must_use]
    pub fn standard(fee_account: AccountId) -> Self {
        Self::new(fee_account, constants::DEFAULT_FEE_PERCENT)
    }

    /// Fee charged on a fill, as a percentage of the taker's payment,
    /// truncating toward zero.
    #[must_use]
    pub fn fill_fee(&self, amount_get: Decimal) -> Decimal {
        percentage(amount_get, self.fee_percent)
    }

    /// Fee a flash-loan recipient must repay on top of the principal,
    /// truncating toward zero.
    #[must_use]
    pub fn loan_fee(&self, amount: Decimal) -> Decimal {
        percentage(amount, self.loan_fee_percent)
    }
}

fn percentage(amount: Decimal, percent: u32) -> Decimal {
    (amount * Decimal::from(percent) / Decimal::from(constants::PERCENT_DENOMINATOR)).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_matches_reference() {
        let fee_account = AccountId::new();
        let cfg = ExchangeConfig::standard(fee_account);
        assert_eq!(cfg.fee_account, fee_account);
        assert_eq!(cfg.fee_percent, 10);
        assert_eq!(cfg.loan_fee_percent, 0);
    }

    #[test]
    fn with_loan_fee_sets_percent() {
        let cfg = ExchangeConfig::new(AccountId::new(), 10).with_loan_fee(1);
        assert_eq!(cfg.loan_fee_percent, 1);
    }

    #[test]
    fn fill_fee_truncates_toward_zero() {
        let cfg = ExchangeConfig::new(AccountId::new(), 10);
        assert_eq!(cfg.fill_fee(Decimal::new(10, 0)), Decimal::ONE);
        // 15 * 10 / 100 = 1.5, truncated to 1
        assert_eq!(cfg.fill_fee(Decimal::new(15, 0)), Decimal::ONE);
        assert_eq!(cfg.fill_fee(Decimal::new(9, 0)), Decimal::ZERO);
    }

    #[test]
    fn zero_percent_charges_nothing() {
        let cfg = ExchangeConfig::new(AccountId::new(), 0);
        assert_eq!(cfg.fill_fee(Decimal::new(1000, 0)), Decimal::ZERO);
        assert_eq!(cfg.loan_fee(Decimal::new(1000, 0)), Decimal::ZERO);
    }

    #[test]
    fn loan_fee_uses_loan_percent() {
        let cfg = ExchangeConfig::new(AccountId::new(), 10).with_loan_fee(1);
        assert_eq!(cfg.loan_fee(Decimal::new(1000, 0)), Decimal::new(10, 0));
        // 150 * 1 / 100 = 1.5, truncated to 1
        assert_eq!(cfg.loan_fee(Decimal::new(150, 0)), Decimal::ONE);
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = ExchangeConfig::standard(AccountId::new());
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ExchangeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}

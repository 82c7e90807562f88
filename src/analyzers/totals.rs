//! Per-currency money accumulation.

use serde::Serialize;

use crate::model::Price;
use crate::parser::DEFAULT_CURRENCY_DIGITS;

/// A running total for one `(currency, digits)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyTotal {
    pub currency_code: String,
    pub currency_digits: u32,
    pub amount: i64,
}

/// Insertion-ordered set of per-currency totals.
///
/// Prices without declared digits are folded into the default-digit bucket
/// of their currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyTotals {
    totals: Vec<MoneyTotal>,
}

impl CurrencyTotals {
    pub fn add(&mut self, price: &Price) {
        let digits = price.currency_digits.unwrap_or(DEFAULT_CURRENCY_DIGITS);
        if let Some(total) = self
            .totals
            .iter_mut()
            .find(|t| t.currency_code == price.currency_code && t.currency_digits == digits)
        {
            total.amount = total.amount.saturating_add(price.amount);
            return;
        }
        self.totals.push(MoneyTotal {
            currency_code: price.currency_code.clone(),
            currency_digits: digits,
            amount: price.amount,
        });
    }

    pub fn into_vec(self) -> Vec<MoneyTotal> {
        self.totals
    }
}

//! Conversion between decimal amounts and the integer minor units stored in SQLite.

use anyhow::{anyhow, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::backend::domain::models::record::{round_money, MONEY_SCALE};

/// Round to cents and return the amount as an integer number of cents
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| anyhow!("Amount {} is out of range", amount))
}

pub fn from_minor_units(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, MONEY_SCALE)
}

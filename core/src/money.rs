//! Display formatting for decimal amounts.
//!
//! Amounts keep full precision everywhere; rounding to cents happens only
//! when a value is turned into text.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount with exactly two decimal places, e.g. `29.97` or `0.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Format a unit price the way it is shown next to a product or cart line:
/// the stored value with trailing zeros dropped (`9.99`, `10`, `0.5`).
pub fn format_price(price: Decimal) -> String {
    price.normalize().to_string()
}

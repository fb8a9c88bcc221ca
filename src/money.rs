use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, half away from zero, and normalizes a
/// negative zero result so that a value like `-0.001` never renders as
/// "-0.00".
pub fn round2(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}

/// Plain signed amount with exactly two decimals, e.g. "-12.50" / "0.00".
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}

/// Absolute amount with two decimals, no sign. Used for "amount owed".
pub fn format_abs(amount: Decimal) -> String {
    format!("{:.2}", round2(amount).abs())
}

/// Colorized balance fragment: red for negative, green otherwise.
pub fn balance_html(amount: Decimal) -> String {
    let rounded = round2(amount);
    let color = if rounded < Decimal::ZERO { "red" } else { "green" };
    format!("<span style=\"color: {color}\">{rounded:.2}</span>")
}

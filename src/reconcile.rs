use rust_decimal::Decimal;

use crate::domain::{BalanceSummary, TransactionTrail};
use crate::money::round2;

/// Derives the start-of-period balance from the authoritative current
/// balance and the trail's net movement.
///
/// `end` is always the upstream-supplied balance, never recomputed from the
/// lines. Summation runs at full precision; rounding happens once, at the
/// summary boundary. An empty trail yields `start == end`.
pub fn reconcile(trail: &TransactionTrail) -> BalanceSummary {
    let net: Decimal = trail.lines.iter().map(|l| l.amount).sum();
    let end = trail.balance;
    BalanceSummary {
        start: round2(end - net),
        net,
        end,
    }
}

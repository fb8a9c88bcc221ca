use chrono::NaiveDate;
use incasso::domain::{TransactionLine, TransactionTrail};
use incasso::money::round2;
use incasso::reconcile::reconcile;
use rust_decimal::Decimal;

fn line(amount: &str) -> TransactionLine {
    TransactionLine {
        year: 2017,
        period: 5,
        date: NaiveDate::from_ymd_opt(2017, 5, 26).expect("valid date"),
        description: "Contributie".to_string(),
        amount: amount.parse().expect("decimal"),
    }
}

fn trail(amounts: &[&str], balance: &str) -> TransactionTrail {
    TransactionTrail {
        lines: amounts.iter().map(|a| line(a)).collect(),
        balance: balance.parse().expect("decimal"),
    }
}

#[test]
fn start_is_end_minus_net() {
    let t = trail(&["12.50", "-3.10", "0.60"], "42.00");
    let s = reconcile(&t);

    assert_eq!(s.end, Decimal::new(4200, 2));
    assert_eq!(s.net, Decimal::new(1000, 2));
    assert_eq!(s.start, round2(s.end - s.net));
    assert_eq!(s.start, Decimal::new(3200, 2));
}

#[test]
fn empty_trail_start_equals_end() {
    let t = trail(&[], "-7.25");
    let s = reconcile(&t);

    assert_eq!(s.net, Decimal::ZERO);
    assert_eq!(s.start, s.end);
}

#[test]
fn end_is_authoritative_never_derived() {
    // The trail clearly does not add up to the balance; end must still be
    // the supplied balance.
    let t = trail(&["1.00"], "999.99");
    let s = reconcile(&t);

    assert_eq!(s.end, Decimal::new(99999, 2));
    assert_eq!(s.start, Decimal::new(99899, 2));
}

#[test]
fn summation_does_not_compound_rounding_error() {
    // 1000 lines of 0.001 net to exactly 1.00; rounding per-line would
    // collapse them to zero.
    let amounts: Vec<String> = (0..1000).map(|_| "0.001".to_string()).collect();
    let refs: Vec<&str> = amounts.iter().map(|s| s.as_str()).collect();
    let t = trail(&refs, "10.00");
    let s = reconcile(&t);

    assert_eq!(s.net, Decimal::new(1, 0));
    assert_eq!(s.start, Decimal::new(900, 2));
}

#[test]
fn member_in_debt_scenario() {
    // Current balance -150.00 with two known transactions.
    let t = trail(&["50.00", "-20.00"], "-150.00");
    let s = reconcile(&t);

    assert_eq!(s.start, Decimal::new(-18000, 2));
    assert_eq!(s.net, Decimal::new(3000, 2));
    assert_eq!(s.end, Decimal::new(-15000, 2));
}

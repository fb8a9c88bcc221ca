use rust_decimal::Decimal;

use crate::domain::ClassifiedAccount;

#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub creditors: Vec<ClassifiedAccount>,
    pub debitors: Vec<ClassifiedAccount>,
}

/// Partitions accounts into creditors (balance > 0) and debitors
/// (balance < 0). Zero-balance accounts belong to neither group.
///
/// Both groups come out sorted ascending by display name, case-sensitive;
/// the sort is stable, so accounts with equal names keep their input order.
pub fn classify(mut accounts: Vec<ClassifiedAccount>) -> Classified {
    accounts.retain(|a| !a.balance.is_zero());
    accounts.sort_by(|a, b| a.name.cmp(&b.name));

    let (creditors, debitors) = accounts
        .into_iter()
        .partition(|a| a.balance > Decimal::ZERO);

    Classified { creditors, debitors }
}

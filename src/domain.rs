use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub iban: String,
    pub bic: Option<String>,
}

/// A debtor/creditor ledger entity from the accounting administration.
///
/// `balance` is `None` until the account's transactions have been fetched
/// and reconciled; "unknown" is not the same thing as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub email: Option<String>,

    #[serde(default)]
    pub bank_accounts: Option<Vec<BankAccount>>,
    #[serde(default)]
    pub main_bank_account: Option<BankAccount>,

    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub trail: Option<TransactionTrail>,
}

/// One transaction line in the reconciliation sign convention: a positive
/// amount increases the account's balance in the customer's favor. This is
/// the negation of the amount as received from the upstream source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Fiscal year, first half of the composite temporal key.
    pub year: i32,
    /// Fiscal period within the year.
    pub period: u8,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

/// The ordered transaction history backing one account's balance, in the
/// order the upstream delivered it, plus the authoritative current balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionTrail {
    pub lines: Vec<TransactionLine>,
    pub balance: Decimal,
}

impl TransactionTrail {
    /// Fiscal years present in the trail, ascending, deduplicated.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.lines.iter().map(|l| l.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Restricts the trail to one fiscal year. The authoritative balance is
    /// kept as-is; reconciliation then yields the start balance relative to
    /// the filtered lines.
    pub fn filter_year(&self, year: i32) -> TransactionTrail {
        TransactionTrail {
            lines: self
                .lines
                .iter()
                .filter(|l| l.year == year)
                .cloned()
                .collect(),
            balance: self.balance,
        }
    }
}

/// Reconciled summary figures for one trail. `end` is the authoritative
/// current balance; `start` is derived (see `reconcile`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSummary {
    pub start: Decimal,
    pub net: Decimal,
    pub end: Decimal,
}

/// An account annotated with its reconciled balance, ready for the
/// creditor/debitor report.
#[derive(Debug, Clone)]
pub struct ClassifiedAccount {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub iban: Option<String>,
    pub balance: Decimal,
    /// Pre-rendered colorized balance fragment.
    pub balance_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: String,
    pub address: String,
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" <{}>", self.name, self.address)
    }
}

/// A fully composed dunning email. Built per request, handed to the mail
/// transport, then discarded; nothing is persisted.
#[derive(Debug, Clone)]
pub struct EmailPayload {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    /// Plain-text fallback body.
    pub text: String,
    pub html: String,
}

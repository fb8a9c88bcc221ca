use crate::domain::Account;
use crate::error::Result;
use crate::exact::{AccountSource, TransactionSource};
use crate::normalize::normalize_trail;

/// Process-wide account directory with fetch-if-absent semantics.
///
/// The account list is fetched at most once per `Directory` lifetime, and a
/// given account's trail/balance is filled in at most once ("absent ->
/// fetched" and "fetched, no balance -> balance known" are the only
/// transitions). `invalidate` is the single way back. The CLI runs a single
/// flow of control; concurrent use would need a per-account compute-once
/// guard around `ensure_balance`.
#[derive(Default)]
pub struct Directory {
    accounts: Option<Vec<Account>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything; the next access re-fetches.
    pub fn invalidate(&mut self) {
        self.accounts = None;
    }

    /// Returns the cached account list, fetching it on first access.
    pub fn ensure_accounts(&mut self, source: &dyn AccountSource) -> Result<&mut Vec<Account>> {
        let accounts = match self.accounts.take() {
            Some(accounts) => accounts,
            None => source.fetch_accounts()?,
        };
        Ok(self.accounts.insert(accounts))
    }

    /// Fills in one account's trail and balance if not already known, plus
    /// the main bank account for accounts that turn out to owe or be owed
    /// something. An account with a known balance is never re-fetched.
    pub fn ensure_balance(
        account: &mut Account,
        accounts: &dyn AccountSource,
        transactions: &dyn TransactionSource,
    ) -> Result<()> {
        if account.balance.is_some() {
            return Ok(());
        }

        let raw = transactions.fetch_trail(account.id, None)?;
        let trail = normalize_trail(&raw)?;

        account.balance = Some(trail.balance);
        if !trail.balance.is_zero() && account.main_bank_account.is_none() {
            account.main_bank_account = accounts.fetch_main_bank_account(account.id)?;
        }
        account.trail = Some(trail);
        Ok(())
    }
}

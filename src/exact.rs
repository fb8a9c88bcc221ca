use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{Account, BankAccount};
use crate::error::{Error, Result};
use crate::normalize::{RawTrail, RawTransactionLine};

/// Source of ledger accounts and their bank details.
pub trait AccountSource {
    fn fetch_accounts(&self) -> Result<Vec<Account>>;
    fn fetch_account(&self, id: Uuid) -> Result<Account>;
    fn fetch_bank_accounts(&self, id: Uuid) -> Result<Vec<BankAccount>>;
    fn fetch_main_bank_account(&self, id: Uuid) -> Result<Option<BankAccount>>;
}

/// Source of an account's transaction history plus its authoritative
/// current balance.
pub trait TransactionSource {
    fn fetch_trail(&self, id: Uuid, year: Option<i32>) -> Result<RawTrail>;
}

/// Exact Online REST client (OData-style JSON). Rate-sensitive: callers
/// process accounts one at a time and cache whatever they fetched.
pub struct ExactClient {
    http: Client,
    base: String,
    division: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ODataList<T> {
    d: ODataResults<T>,
}

#[derive(Debug, Deserialize)]
struct ODataResults<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    #[serde(rename = "ID")]
    id: Uuid,
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBankAccount {
    #[serde(rename = "BankAccount")]
    iban: Option<String>,
    #[serde(rename = "BICCode")]
    bic: Option<String>,
    #[serde(rename = "Main")]
    main: bool,
}

#[derive(Debug, Deserialize)]
struct RawReceivable {
    #[serde(rename = "Amount")]
    amount: Decimal,
}

impl RawAccount {
    fn into_account(self) -> Account {
        Account {
            id: self.id,
            // Exact pads account codes with leading spaces.
            code: self.code.trim().to_string(),
            name: self.name,
            email: self.email,
            bank_accounts: None,
            main_bank_account: None,
            balance: None,
            trail: None,
        }
    }
}

impl ExactClient {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let division = cfg.division.clone().ok_or_else(|| {
            Error::UpstreamFetch("no division configured; run: incasso login --division <nr>".into())
        })?;
        let token = cfg.access_token.clone().ok_or_else(|| {
            Error::UpstreamFetch(
                "no access token configured; run: incasso login --access-token <token>".into(),
            )
        })?;

        let http = Client::builder()
            .build()
            .map_err(|e| Error::UpstreamFetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base: cfg.api_base.trim_end_matches('/').to_string(),
            division,
            token,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let url = format!("{}/v1/{}/{}", self.base, self.division, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .map_err(|e| Error::UpstreamFetch(format!("GET {path}: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::UpstreamFetch(format!(
                "GET {path}: HTTP {}",
                resp.status()
            )));
        }

        let list: ODataList<T> = resp
            .json()
            .map_err(|e| Error::UpstreamFetch(format!("GET {path}: invalid JSON: {e}")))?;
        Ok(list.d.results)
    }
}

impl AccountSource for ExactClient {
    fn fetch_accounts(&self) -> Result<Vec<Account>> {
        let raw: Vec<RawAccount> = self.get(
            "crm/Accounts",
            &[
                ("$select", "ID,Code,Name,Email".to_string()),
                ("$filter", "Status eq 'C'".to_string()),
            ],
        )?;
        Ok(raw.into_iter().map(RawAccount::into_account).collect())
    }

    fn fetch_account(&self, id: Uuid) -> Result<Account> {
        let raw: Vec<RawAccount> = self.get(
            "crm/Accounts",
            &[
                ("$select", "ID,Code,Name,Email".to_string()),
                ("$filter", format!("ID eq guid'{id}'")),
            ],
        )?;
        raw.into_iter()
            .next()
            .map(RawAccount::into_account)
            .ok_or_else(|| Error::UpstreamFetch(format!("account {id} not found")))
    }

    fn fetch_bank_accounts(&self, id: Uuid) -> Result<Vec<BankAccount>> {
        let raw: Vec<RawBankAccount> = self.get(
            "crm/BankAccounts",
            &[("$filter", format!("Account eq guid'{id}'"))],
        )?;
        Ok(raw
            .into_iter()
            .filter_map(|b| b.iban.map(|iban| BankAccount { iban, bic: b.bic }))
            .collect())
    }

    fn fetch_main_bank_account(&self, id: Uuid) -> Result<Option<BankAccount>> {
        let raw: Vec<RawBankAccount> = self.get(
            "crm/BankAccounts",
            &[("$filter", format!("Account eq guid'{id}'"))],
        )?;
        Ok(raw
            .into_iter()
            .filter(|b| b.main)
            .find_map(|b| b.iban.map(|iban| BankAccount { iban, bic: b.bic })))
    }
}

impl TransactionSource for ExactClient {
    fn fetch_trail(&self, id: Uuid, year: Option<i32>) -> Result<RawTrail> {
        let mut filter = format!("Account eq guid'{id}'");
        if let Some(year) = year {
            filter.push_str(&format!(" and FinancialYear eq {year}"));
        }
        let lines: Vec<RawTransactionLine> = self.get(
            "financialtransaction/TransactionLines",
            &[
                (
                    "$select",
                    "FinancialYear,FinancialPeriod,Date,Description,AmountDC".to_string(),
                ),
                ("$filter", filter),
            ],
        )?;

        // The authoritative balance comes from the open receivables, not
        // from the (possibly year-filtered) transaction lines. A receivable
        // is money owed to the administration, so the member's balance is
        // its negation.
        let receivables: Vec<RawReceivable> = self.get(
            "read/financial/ReceivablesList",
            &[("$filter", format!("AccountId eq guid'{id}'"))],
        )?;
        let balance: Decimal = -receivables.iter().map(|r| r.amount).sum::<Decimal>();

        Ok(RawTrail { lines, balance })
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{TransactionLine, TransactionTrail};
use crate::error::{Error, Result};

/// A transaction line exactly as the upstream API serializes it: a legacy
/// Microsoft AJAX date wrapper and an amount in the bookkeeping sign
/// convention (debit negative from the customer's point of view).
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransactionLine {
    #[serde(rename = "FinancialYear")]
    pub financial_year: i32,
    #[serde(rename = "FinancialPeriod")]
    pub financial_period: u8,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "AmountDC")]
    pub amount_dc: Decimal,
}

/// A fetched-but-unnormalized trail: raw lines plus the authoritative
/// current balance reported by the upstream.
#[derive(Debug, Clone)]
pub struct RawTrail {
    pub lines: Vec<RawTransactionLine>,
    pub balance: Decimal,
}

/// Parses the upstream's `/Date(<millis>)/` wrapper into a calendar date,
/// truncated to day precision (UTC interpretation of the epoch value).
pub fn parse_ms_ajax_date(raw: &str) -> Result<NaiveDate> {
    let inner = raw
        .strip_prefix("/Date(")
        .and_then(|s| s.strip_suffix(")/"))
        .ok_or_else(|| Error::MalformedRecord(format!("unexpected date wrapper: {raw:?}")))?;

    let millis: i64 = inner
        .parse()
        .map_err(|_| Error::MalformedRecord(format!("non-integer epoch millis: {raw:?}")))?;

    let dt = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::MalformedRecord(format!("epoch millis out of range: {raw:?}")))?;

    Ok(dt.date_naive())
}

/// Converts one raw line to the reconciliation convention.
///
/// The sign flip is mandatory: upstream reports amounts from the books'
/// perspective, balances are reported to members from theirs. Getting this
/// backwards inverts every balance in the system.
pub fn normalize(raw: &RawTransactionLine) -> Result<TransactionLine> {
    Ok(TransactionLine {
        year: raw.financial_year,
        period: raw.financial_period,
        date: parse_ms_ajax_date(&raw.date)?,
        description: raw.description.clone(),
        amount: -raw.amount_dc,
    })
}

/// Normalizes a whole trail, keeping the upstream's line order. Any
/// malformed line fails the account's trail as a unit.
pub fn normalize_trail(raw: &RawTrail) -> Result<TransactionTrail> {
    let lines = raw.lines.iter().map(normalize).collect::<Result<Vec<_>>>()?;
    Ok(TransactionTrail {
        lines,
        balance: raw.balance,
    })
}

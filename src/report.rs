use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::classify::{Classified, classify};
use crate::directory::Directory;
use crate::domain::{Account, ClassifiedAccount, TransactionTrail};
use crate::error::Result;
use crate::exact::{AccountSource, TransactionSource};
use crate::money::{balance_html, format_amount};
use crate::reconcile::reconcile;
use crate::render::{escape_html, render};

const ACCOUNT_LIST_TEMPLATE: &str = r#"<table>{{#.}}<tr>
  <td>{{code}}</td>
  <td>{{name}}</td>
  <td>{{email}}</td>
  </tr>{{/.}}</table>"#;

const BALANCE_LIST_TEMPLATE: &str = r#"<table>{{#.}}<tr>
  <td style="text-align: right;">{{code}}</td>
  <td>{{name}}</td>
  <td>{{email}}</td>
  <td>{{iban}}</td>
  <td style="text-align: right;">{{{balance_html}}}</td>
  </tr>{{/.}}</table>"#;

/// An account the batch report could not reconcile. The rest of the report
/// is unaffected; the failure is annotated, not fatal.
#[derive(Debug, Clone)]
pub struct FailedAccount {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub reason: String,
}

pub fn account_list_html(accounts: &[Account]) -> String {
    let rows: Vec<Value> = accounts
        .iter()
        .map(|a| {
            json!({
                "code": a.code,
                "name": a.name,
                "email": a.email.as_deref().unwrap_or(""),
            })
        })
        .collect();
    render(ACCOUNT_LIST_TEMPLATE, &Value::Array(rows))
}

fn balance_list_html(accounts: &[ClassifiedAccount]) -> String {
    let rows: Vec<Value> = accounts
        .iter()
        .map(|a| {
            json!({
                "code": a.code,
                "name": a.name,
                "email": a.email.as_deref().unwrap_or(""),
                "iban": a.iban.as_deref().unwrap_or(""),
                "balance_html": a.balance_html,
            })
        })
        .collect();
    render(BALANCE_LIST_TEMPLATE, &Value::Array(rows))
}

/// Renders one trail as the transaction table used in both the per-account
/// view and the dunning mail: one row per line with separate outflow/inflow
/// columns, then totals and the reconciled start/end balances. All figures
/// in the footer come from `reconcile`, so every display path agrees.
pub fn transaction_table_html(trail: &TransactionTrail) -> String {
    let mut tbl = String::from("<table style=\"border-spacing: 7pt 0pt\">\n");
    tbl.push_str(
        "<tr><th style=\"text-align: left\">Periode</th>\
         <th style=\"text-align: left\">Datum</th>\
         <th style=\"text-align: left\">Omschrijving</th>\
         <th style=\"text-align: right\">Uit (\u{20ac})</th>\
         <th style=\"text-align: right\">In (\u{20ac})</th></tr>\n",
    );

    let mut out_sum = Decimal::ZERO;
    let mut in_sum = Decimal::ZERO;
    for line in &trail.lines {
        let (uit, inn) = if line.amount < Decimal::ZERO {
            out_sum += line.amount;
            (format_amount(line.amount), String::new())
        } else {
            in_sum += line.amount;
            (String::new(), format_amount(line.amount))
        };
        tbl.push_str(&format!(
            "<tr><td>{}.{}</td><td>{}</td><td>{}</td>\
             <td style=\"color: red; text-align: right\">{}</td>\
             <td style=\"color: green; text-align: right\">{}</td></tr>\n",
            line.year,
            line.period,
            line.date.format("%Y-%m-%d"),
            escape_html(&line.description),
            uit,
            inn,
        ));
    }

    tbl.push_str("<tr><td>&nbsp;</td></tr>\n");
    tbl.push_str(&format!(
        "<tr><td></td><td></td><th style=\"text-align: left\">Totaal</th>\
         <td style=\"color: red; text-align: right\">{}</td>\
         <td style=\"color: green; text-align: right\">{}</td></tr>\n",
        format_amount(out_sum),
        format_amount(in_sum),
    ));
    tbl.push_str("<tr><td>&nbsp;</td></tr>\n");

    let summary = reconcile(trail);
    tbl.push_str(&summary_row("Beginsaldo:", summary.start));
    tbl.push_str(&summary_row("Saldo:", summary.end));
    tbl.push_str("</table>\n");
    tbl
}

/// Balance figure placed in the red (outflow) or green (inflow) column.
fn summary_row(label: &str, amount: Decimal) -> String {
    let (uit, inn) = if amount < Decimal::ZERO {
        (format_amount(amount), String::new())
    } else {
        (String::new(), format_amount(amount))
    };
    format!(
        "<tr><td></td><td></td><th style=\"text-align: left\">{label}</th>\
         <td style=\"color: red; text-align: right\">{uit}</td>\
         <td style=\"color: green; text-align: right\">{inn}</td></tr>\n",
    )
}

/// Walks every cached account, reconciling balances sequentially (the
/// upstream is rate-sensitive). Accounts are processed in reverse fetch
/// order; classification re-sorts later. A failure on one account is
/// recorded and the batch continues.
pub fn collect_balances(
    directory: &mut Directory,
    accounts_src: &dyn AccountSource,
    transactions: &dyn TransactionSource,
    mut progress: impl FnMut(),
) -> Result<(Vec<ClassifiedAccount>, Vec<FailedAccount>)> {
    let accounts = directory.ensure_accounts(accounts_src)?;

    let mut with_balance = Vec::new();
    let mut failures = Vec::new();
    for account in accounts.iter_mut().rev() {
        match Directory::ensure_balance(account, accounts_src, transactions) {
            Ok(()) => {
                if let Some(balance) = account.balance {
                    with_balance.push(ClassifiedAccount {
                        id: account.id,
                        code: account.code.clone(),
                        name: account.name.clone(),
                        email: account.email.clone(),
                        iban: account.main_bank_account.as_ref().map(|b| b.iban.clone()),
                        balance,
                        balance_html: balance_html(balance),
                    });
                }
            }
            Err(err) => failures.push(FailedAccount {
                id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                reason: err.to_string(),
            }),
        }
        progress();
    }

    Ok((with_balance, failures))
}

/// The full creditor/debitor report: counts, one table per group, and a
/// distinct section for accounts that failed to reconcile.
pub fn balance_report_html(
    with_balance: Vec<ClassifiedAccount>,
    failures: &[FailedAccount],
    total: usize,
) -> String {
    let nonzero = with_balance.iter().filter(|a| !a.balance.is_zero()).count();
    let Classified { creditors, debitors } = classify(with_balance);

    let mut html = String::new();
    html.push_str(&format!(
        "Got {total} accounts, {nonzero} with a non-zero balance.<br><br>\n"
    ));

    html.push_str(&format!("Got {} creditors: <br><br>\n", creditors.len()));
    html.push_str(&balance_list_html(&creditors));
    html.push_str("<br><br>\n");

    html.push_str(&format!("Got {} debitors: <br><br>\n", debitors.len()));
    html.push_str(&balance_list_html(&debitors));
    html.push_str("<br><br>\n");

    if !failures.is_empty() {
        html.push_str(&format!(
            "Skipped {} accounts that failed to reconcile:<br>\n<ul>\n",
            failures.len()
        ));
        for f in failures {
            html.push_str(&format!(
                "<li>{} {} ({}): {}</li>\n",
                escape_html(&f.code),
                escape_html(&f.name),
                f.id,
                escape_html(&f.reason),
            ));
        }
        html.push_str("</ul>\n");
    }

    html
}

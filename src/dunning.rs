use rust_decimal::Decimal;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::domain::{Account, EmailPayload, Mailbox, TransactionTrail};
use crate::error::{Error, Result};
use crate::money::{balance_html, format_abs, format_amount};
use crate::reconcile::reconcile;
use crate::render::render;
use crate::report::transaction_table_html;

pub const STANDARD_TEMPLATE: &str = "standard_email";
pub const EXTREME_TEMPLATE: &str = "extreme_email";

/// Backing store for the two mail template variants.
pub trait TemplateStore {
    fn load(&self, name: &str) -> Result<String>;
}

/// Loads templates from a directory on disk, one file per variant.
pub struct FileTemplates {
    dir: PathBuf,
}

impl FileTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateStore for FileTemplates {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| {
            // A missing variant and an unreadable templates dir are
            // different problems; only the former means "not found".
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::TemplateNotFound(path.display().to_string())
            } else {
                Error::TemplateUnreadable(format!("{}: {e}", path.display()))
            }
        })
    }
}

/// The escalation rule: at or below the configured severe-debt threshold
/// the sterner template takes over.
pub fn select_template(end_balance: Decimal, threshold: Decimal) -> &'static str {
    if end_balance <= threshold {
        EXTREME_TEMPLATE
    } else {
        STANDARD_TEMPLATE
    }
}

/// Composes the dunning mail for one account: picks the template variant by
/// the reconciled end balance, merges in the account and balance variables,
/// and returns the ready-to-send payload. A missing template resource is an
/// error for this request; no other variant is silently substituted.
pub fn generate(
    account: &Account,
    trail: &TransactionTrail,
    cfg: &AppConfig,
    templates: &dyn TemplateStore,
) -> Result<EmailPayload> {
    let email = account.email.clone().ok_or_else(|| {
        Error::MalformedRecord(format!("account {} has no contact email", account.code))
    })?;

    let summary = reconcile(trail);
    let template = templates.load(select_template(summary.end, cfg.extreme_threshold))?;

    let variables = json!({
        "name": account.name,
        "amount": format_abs(summary.end),
        "balance": format_amount(summary.end),
        "balance_colored": balance_html(summary.end),
        "transactions": transaction_table_html(trail),
    });
    let html = render(&template, &variables);

    Ok(EmailPayload {
        from: Mailbox {
            name: cfg.sender_name.clone(),
            address: cfg.sender_email.clone(),
        },
        to: Mailbox {
            name: account.name.clone(),
            address: email,
        },
        subject: cfg.subject.clone(),
        text: "Please view HTML body".to_string(),
        html,
    })
}

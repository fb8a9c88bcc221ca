use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "incasso")]
#[command(about = "Debtor/creditor balance reports and dunning emails", long_about = None)]
pub struct Cli {
    /// Override incasso home directory (config/data subdirs will be created inside it).
    #[arg(long, env = "INCASSO_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Login(LoginArgs),

    Accounts(AccountsArgs),
    Account(AccountArgs),
    Balances(BalancesArgs),
    Trans(TransArgs),

    PreviewMail(PreviewMailArgs),
    SendMail(SendMailArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Accounting API base URL.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Administration (division) number.
    #[arg(long)]
    pub division: Option<String>,

    /// OAuth2 access token for the accounting API.
    #[arg(long)]
    pub access_token: Option<String>,

    #[arg(long)]
    pub sender_name: Option<String>,

    #[arg(long)]
    pub sender_email: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// Balance at or below which the severe-debt template is used.
    /// Negative by definition, so leading hyphens are fine.
    #[arg(long, allow_hyphen_values = true)]
    pub extreme_threshold: Option<String>,

    #[arg(long)]
    pub templates_dir: Option<String>,

    #[arg(long)]
    pub outbox_dir: Option<String>,
}

#[derive(Debug, Args)]
pub struct AccountsArgs {
    /// Write the HTML report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Dumps one account as JSON, bank accounts and trail included.
    pub account: Uuid,
}

#[derive(Debug, Args)]
pub struct BalancesArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TransArgs {
    pub account: Uuid,

    /// Restrict to one fiscal year.
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewMailArgs {
    pub account: Uuid,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SendMailArgs {
    pub account: Uuid,

    #[arg(long)]
    pub year: Option<i32>,

    /// Override the configured outbox directory.
    #[arg(long)]
    pub outbox: Option<PathBuf>,
}

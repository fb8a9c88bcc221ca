use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};

use incasso::cli::{
    AccountArgs, AccountsArgs, BalancesArgs, Cli, Command, LoginArgs, PreviewMailArgs,
    SendMailArgs, TransArgs,
};
use incasso::config::{AppConfig, AppPaths, app_paths, load_or_init_config, write_config};
use incasso::directory::Directory;
use incasso::domain::{Account, TransactionTrail};
use incasso::dunning::{self, FileTemplates};
use incasso::exact::{AccountSource, ExactClient, TransactionSource};
use incasso::mail::{MailTransport, OutboxTransport};
use incasso::normalize::normalize_trail;
use incasso::render::escape_html;
use incasso::report;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = app_paths(cli.home.clone())?;
    let (mut cfg, cfg_path) = load_or_init_config(&paths)?;

    match cli.command {
        Command::Login(args) => handle_login(args, &mut cfg, &cfg_path),
        cmd => {
            let client = ExactClient::from_config(&cfg)?;
            match cmd {
                Command::Accounts(args) => handle_accounts(&client, args),
                Command::Account(args) => handle_account(&client, args),
                Command::Balances(args) => handle_balances(&client, args),
                Command::Trans(args) => handle_trans(&client, args),
                Command::PreviewMail(args) => handle_preview_mail(&client, &cfg, args),
                Command::SendMail(args) => handle_send_mail(&client, &cfg, &paths, args),
                Command::Login(_) => unreachable!("handled above"),
            }
        }
    }
}

fn handle_login(args: LoginArgs, cfg: &mut AppConfig, cfg_path: &Path) -> Result<()> {
    let mut changed = false;

    if let Some(v) = args.api_base {
        cfg.api_base = v;
        changed = true;
    }
    if let Some(v) = args.division {
        cfg.division = Some(v);
        changed = true;
    }
    if let Some(v) = args.access_token {
        cfg.access_token = Some(v);
        changed = true;
    }
    if let Some(v) = args.sender_name {
        cfg.sender_name = v;
        changed = true;
    }
    if let Some(v) = args.sender_email {
        cfg.sender_email = v;
        changed = true;
    }
    if let Some(v) = args.subject {
        cfg.subject = v;
        changed = true;
    }
    if let Some(raw) = args.extreme_threshold {
        cfg.extreme_threshold = raw
            .parse()
            .with_context(|| format!("Invalid threshold amount: {raw}"))?;
        changed = true;
    }
    if let Some(v) = args.templates_dir {
        cfg.templates_dir = Some(v);
        changed = true;
    }
    if let Some(v) = args.outbox_dir {
        cfg.outbox_dir = Some(v);
        changed = true;
    }

    if changed {
        write_config(cfg_path, cfg)?;
    }

    println!("api_base\t{}", cfg.api_base);
    println!(
        "division\t{}",
        cfg.division.as_deref().unwrap_or("<not set>")
    );
    println!(
        "access_token\t{}",
        if cfg.access_token.is_some() {
            "<set>"
        } else {
            "<not set>"
        }
    );
    println!("sender\t\"{}\" <{}>", cfg.sender_name, cfg.sender_email);
    println!("subject\t{}", cfg.subject);
    println!("extreme_threshold\t{}", cfg.extreme_threshold);

    Ok(())
}

fn write_output(out: Option<PathBuf>, html: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
        }
    }
    Ok(())
}

fn handle_accounts(client: &ExactClient, args: AccountsArgs) -> Result<()> {
    let mut directory = Directory::new();
    let accounts = directory.ensure_accounts(client)?;

    let mut html = String::from("Listing all debitor/creditor accounts...<br><br>\n");
    html.push_str(&report::account_list_html(accounts));
    write_output(args.out, &html)
}

/// Full detail for one account as JSON: contact data, bank accounts, and
/// the normalized trail with its balance.
fn handle_account(client: &ExactClient, args: AccountArgs) -> Result<()> {
    let mut account = client.fetch_account(args.account)?;
    account.bank_accounts = Some(client.fetch_bank_accounts(args.account)?);

    let trail = normalize_trail(&client.fetch_trail(args.account, None)?)?;
    account.balance = Some(trail.balance);
    account.trail = Some(trail);

    println!("{}", serde_json::to_string_pretty(&account)?);
    Ok(())
}

fn handle_balances(client: &ExactClient, args: BalancesArgs) -> Result<()> {
    let mut directory = Directory::new();
    let total = directory.ensure_accounts(client)?.len();
    eprintln!("Got {total} accounts. Fetching transactions and computing balances...");

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let (with_balance, failures) =
        report::collect_balances(&mut directory, client, client, || pb.inc(1))?;
    pb.finish_and_clear();

    let html = report::balance_report_html(with_balance, &failures, total);
    write_output(args.out, &html)
}

/// Trail for the dunning mail: the fiscal-year filter is applied upstream,
/// like the per-year transaction endpoint does.
fn mail_trail(
    client: &ExactClient,
    account: &Account,
    year: Option<i32>,
) -> Result<TransactionTrail> {
    let raw = client.fetch_trail(account.id, year)?;
    Ok(normalize_trail(&raw)?)
}

fn handle_trans(client: &ExactClient, args: TransArgs) -> Result<()> {
    let account = client.fetch_account(args.account)?;

    // Fetch the full trail so the overview can list every available fiscal
    // year; the year restriction is applied locally.
    let trail = normalize_trail(&client.fetch_trail(args.account, None)?)?;
    let years = trail.years();
    let trail = match args.year {
        Some(year) => trail.filter_year(year),
        None => trail,
    };

    let mut html = format!(
        "Listing transaction lines for {}:<br><br>\n",
        escape_html(&account.name)
    );
    html.push_str("Years: ");
    html.push_str(
        &years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(" "),
    );
    html.push_str("<br><br>\n");
    html.push_str(&report::transaction_table_html(&trail));
    write_output(args.out, &html)
}

fn handle_preview_mail(client: &ExactClient, cfg: &AppConfig, args: PreviewMailArgs) -> Result<()> {
    let account = client.fetch_account(args.account)?;
    let trail = mail_trail(client, &account, args.year)?;

    let templates = FileTemplates::new(cfg.templates_dir.as_deref().unwrap_or("templates"));
    let payload = dunning::generate(&account, &trail, cfg, &templates)?;
    write_output(args.out, &payload.html)
}

fn handle_send_mail(
    client: &ExactClient,
    cfg: &AppConfig,
    paths: &AppPaths,
    args: SendMailArgs,
) -> Result<()> {
    let account = client.fetch_account(args.account)?;
    let trail = mail_trail(client, &account, args.year)?;

    let templates = FileTemplates::new(cfg.templates_dir.as_deref().unwrap_or("templates"));
    let payload = dunning::generate(&account, &trail, cfg, &templates)?;

    let outbox = args
        .outbox
        .or_else(|| cfg.outbox_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| paths.data_dir.join("outbox"));
    let transport = OutboxTransport::new(outbox);
    let receipt = transport.send(&payload)?;

    println!("Message {} sent: {}", receipt.message_id, receipt.detail);
    Ok(())
}

use chrono::NaiveDate;
use incasso::Error;
use incasso::config::AppConfig;
use incasso::domain::{Account, TransactionLine, TransactionTrail};
use incasso::dunning::{EXTREME_TEMPLATE, FileTemplates, STANDARD_TEMPLATE, generate, select_template};
use rust_decimal::Decimal;
use std::fs;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal")
}

fn account(name: &str, email: Option<&str>) -> Account {
    Account {
        id: Uuid::new_v4(),
        code: "123".to_string(),
        name: name.to_string(),
        email: email.map(str::to_string),
        bank_accounts: None,
        main_bank_account: None,
        balance: None,
        trail: None,
    }
}

fn trail(amounts: &[&str], balance: &str) -> TransactionTrail {
    TransactionTrail {
        lines: amounts
            .iter()
            .map(|a| TransactionLine {
                year: 2017,
                period: 3,
                date: NaiveDate::from_ymd_opt(2017, 3, 1).expect("valid date"),
                description: "Contributie".to_string(),
                amount: a.parse().expect("decimal"),
            })
            .collect(),
        balance: balance.parse().expect("decimal"),
    }
}

fn templates_fixture() -> (tempfile::TempDir, FileTemplates) {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("standard_email"),
        "STANDARD for {{name}}: owes {{amount}}, balance {{balance}} {{{balance_colored}}}\n{{{transactions}}}",
    )
    .expect("write standard");
    fs::write(
        dir.path().join("extreme_email"),
        "EXTREME for {{name}}: owes {{amount}}\n{{{transactions}}}",
    )
    .expect("write extreme");
    let store = FileTemplates::new(dir.path());
    (dir, store)
}

#[test]
fn threshold_boundaries() {
    let threshold = dec("-100");
    assert_eq!(select_template(dec("-100.00"), threshold), EXTREME_TEMPLATE);
    assert_eq!(select_template(dec("-100.01"), threshold), EXTREME_TEMPLATE);
    assert_eq!(select_template(dec("-99.99"), threshold), STANDARD_TEMPLATE);
    assert_eq!(select_template(dec("0"), threshold), STANDARD_TEMPLATE);
    assert_eq!(select_template(dec("250.00"), threshold), STANDARD_TEMPLATE);
}

#[test]
fn threshold_is_configurable() {
    assert_eq!(select_template(dec("-50"), dec("-50")), EXTREME_TEMPLATE);
    assert_eq!(select_template(dec("-49.99"), dec("-50")), STANDARD_TEMPLATE);
}

#[test]
fn severe_debt_selects_the_extreme_variant() {
    let (_dir, store) = templates_fixture();
    let cfg = AppConfig::default();

    // End balance -150.00: start -180.00, net +30.00.
    let t = trail(&["50.00", "-20.00"], "-150.00");
    let payload = generate(&account("Piet Paulusma", Some("piet@example.org")), &t, &cfg, &store)
        .expect("generate");

    assert!(payload.html.starts_with("EXTREME for Piet Paulusma"));
    assert!(payload.html.contains("owes 150.00"));
    assert!(payload.html.contains("Beginsaldo:"));
    assert!(payload.html.contains("-180.00"));
    assert!(payload.html.contains("-150.00"));
}

#[test]
fn mild_debt_selects_the_standard_variant() {
    let (_dir, store) = templates_fixture();
    let cfg = AppConfig::default();

    let t = trail(&[], "-99.99");
    let payload = generate(&account("Jan", Some("jan@example.org")), &t, &cfg, &store)
        .expect("generate");

    assert!(payload.html.starts_with("STANDARD for Jan"));
    assert!(payload.html.contains("owes 99.99"));
    assert!(payload.html.contains("balance -99.99"));
    assert!(payload.html.contains("<span style=\"color: red\">-99.99</span>"));
}

#[test]
fn payload_identities_and_subject() {
    let (_dir, store) = templates_fixture();
    let cfg = AppConfig {
        sender_name: "Treasurer".to_string(),
        sender_email: "treasurer@example.org".to_string(),
        subject: "Incasso".to_string(),
        ..AppConfig::default()
    };

    let payload = generate(
        &account("Jan Jansen", Some("jan@example.org")),
        &trail(&[], "-10.00"),
        &cfg,
        &store,
    )
    .expect("generate");

    assert_eq!(payload.from.to_string(), "\"Treasurer\" <treasurer@example.org>");
    assert_eq!(payload.to.to_string(), "\"Jan Jansen\" <jan@example.org>");
    assert_eq!(payload.subject, "Incasso");
    assert_eq!(payload.text, "Please view HTML body");
}

#[test]
fn member_name_is_escaped_in_the_body() {
    let (_dir, store) = templates_fixture();
    let cfg = AppConfig::default();

    let payload = generate(
        &account("Jan <script>", Some("jan@example.org")),
        &trail(&[], "-10.00"),
        &cfg,
        &store,
    )
    .expect("generate");

    assert!(payload.html.contains("Jan &lt;script&gt;"));
    assert!(!payload.html.contains("Jan <script>"));
}

#[test]
fn missing_template_is_an_error_not_a_substitution() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Only the standard variant exists.
    fs::write(dir.path().join("standard_email"), "STANDARD").expect("write");
    let store = FileTemplates::new(dir.path());
    let cfg = AppConfig::default();

    let err = generate(
        &account("Jan", Some("jan@example.org")),
        &trail(&[], "-150.00"),
        &cfg,
        &store,
    )
    .expect_err("extreme template missing");
    assert!(matches!(err, Error::TemplateNotFound(_)), "{err}");

    // The standard variant still works for a mild debt.
    generate(&account("Jan", Some("jan@example.org")), &trail(&[], "-1.00"), &cfg, &store)
        .expect("standard generates");
}

#[test]
fn unreadable_template_is_not_reported_as_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    // The variant exists on disk but cannot be read as a file.
    fs::create_dir(dir.path().join("standard_email")).expect("mkdir");
    let store = FileTemplates::new(dir.path());
    let cfg = AppConfig::default();

    let err = generate(
        &account("Jan", Some("jan@example.org")),
        &trail(&[], "-1.00"),
        &cfg,
        &store,
    )
    .expect_err("directory is not a template");
    assert!(matches!(err, Error::TemplateUnreadable(_)), "{err}");
}

#[test]
fn account_without_email_is_rejected() {
    let (_dir, store) = templates_fixture();
    let cfg = AppConfig::default();

    let err = generate(&account("Jan", None), &trail(&[], "-150.00"), &cfg, &store)
        .expect_err("no recipient");
    assert!(matches!(err, Error::MalformedRecord(_)));
}

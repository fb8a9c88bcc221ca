use incasso::classify::classify;
use incasso::domain::ClassifiedAccount;
use incasso::money::balance_html;
use rust_decimal::Decimal;
use uuid::Uuid;

fn acc(name: &str, balance: &str) -> ClassifiedAccount {
    let balance: Decimal = balance.parse().expect("decimal");
    ClassifiedAccount {
        id: Uuid::new_v4(),
        code: "1".to_string(),
        name: name.to_string(),
        email: None,
        iban: None,
        balance,
        balance_html: balance_html(balance),
    }
}

fn names(group: &[ClassifiedAccount]) -> Vec<&str> {
    group.iter().map(|a| a.name.as_str()).collect()
}

#[test]
fn splits_by_balance_sign_and_drops_zero() {
    let out = classify(vec![acc("Ava", "10"), acc("Bo", "0"), acc("Cas", "-5")]);

    assert_eq!(names(&out.creditors), vec!["Ava"]);
    assert_eq!(names(&out.debitors), vec!["Cas"]);
}

#[test]
fn empty_input_yields_empty_groups() {
    let out = classify(vec![]);
    assert!(out.creditors.is_empty());
    assert!(out.debitors.is_empty());
}

#[test]
fn all_zero_yields_empty_groups() {
    let out = classify(vec![acc("Ava", "0"), acc("Bo", "0.00")]);
    assert!(out.creditors.is_empty());
    assert!(out.debitors.is_empty());
}

#[test]
fn groups_are_sorted_by_name_ascending() {
    let out = classify(vec![
        acc("Zef", "1"),
        acc("Ava", "2"),
        acc("Mila", "-3"),
        acc("Bo", "-4"),
    ]);

    assert_eq!(names(&out.creditors), vec!["Ava", "Zef"]);
    assert_eq!(names(&out.debitors), vec!["Bo", "Mila"]);
}

#[test]
fn sorting_is_case_sensitive() {
    // Uppercase sorts before lowercase in a case-sensitive lexical order.
    let out = classify(vec![acc("anna", "1"), acc("Bert", "1")]);
    assert_eq!(names(&out.creditors), vec!["Bert", "anna"]);
}

#[test]
fn equal_names_keep_input_order() {
    let mut first = acc("Jan", "5");
    first.code = "first".to_string();
    let mut second = acc("Jan", "7");
    second.code = "second".to_string();

    let out = classify(vec![first, second]);
    let codes: Vec<&str> = out.creditors.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["first", "second"]);
}

#[test]
fn deterministic_for_identical_input() {
    let build = || {
        vec![
            acc("Ava", "1"),
            acc("Bo", "-2"),
            acc("Cas", "0"),
            acc("Dex", "3"),
        ]
    };
    let a = classify(build());
    let b = classify(build());
    assert_eq!(names(&a.creditors), names(&b.creditors));
    assert_eq!(names(&a.debitors), names(&b.debitors));
}

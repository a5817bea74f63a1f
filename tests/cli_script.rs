use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::tempdir;

#[test]
fn walkthrough_prints_book_risk_and_export() {
    let home = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("prism_core_cli").unwrap();
    let assert = cmd
        .env("PRISM_CORE_HOME", home.path())
        .assert()
        .success()
        .stdout(contains("Accounts"))
        .stdout(contains("1234567890"))
        .stdout(contains("Main Checking Account"))
        .stdout(contains("Posted"))
        .stdout(contains("Risk summary"))
        .stdout(contains("Transaction export"))
        .stdout(contains(
            "Date,Reference,Type,From Account,To Account,Amount,Currency,Status,Description",
        ));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let reference = Regex::new(r"TXN-[0-9A-Z]+-[0-9A-Z]{6}").unwrap();
    assert!(
        reference.is_match(&stdout),
        "expected a transaction reference in:\n{stdout}"
    );

    // State lands under the provided home directory.
    assert!(home.path().join("state").join("accounts.json").is_file());
    assert!(home.path().join("state").join("transactions.json").is_file());
}

#[test]
fn second_run_reuses_the_persisted_book() {
    let home = tempdir().unwrap();

    Command::cargo_bin("prism_core_cli")
        .unwrap()
        .env("PRISM_CORE_HOME", home.path())
        .assert()
        .success();

    // The first run moved 2500 out of the main checking account; the second
    // run must see that balance instead of a reseeded book.
    Command::cargo_bin("prism_core_cli")
        .unwrap()
        .env("PRISM_CORE_HOME", home.path())
        .assert()
        .success()
        .stdout(contains("13250.50"))
        .stdout(predicate::str::contains("15750.50").not());
}

use std::sync::Arc;

use chrono::NaiveDate;
use prism_core::currency::Currency;
use prism_core::domain::transaction::TransactionDraft;
use prism_core::domain::{AccountStatus, AccountType, NewAccount};
use prism_core::export::transactions_to_csv;
use prism_core::storage::MemoryStorage;
use prism_core::stores::{AccountStore, TransactionStore};

fn new_account(name: &str, balance: f64) -> NewAccount {
    NewAccount {
        name: name.into(),
        account_type: AccountType::Checking,
        status: AccountStatus::Active,
        currency: Currency::Usd,
        balance,
        available_balance: None,
        interest_rate: None,
        open_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        maturity_date: None,
        last_activity_date: None,
        notes: None,
    }
}

#[test]
fn exported_csv_parses_back_with_a_csv_reader() {
    let backend = Arc::new(MemoryStorage::new());
    let mut accounts = AccountStore::load(backend.clone()).expect("accounts");
    let mut transactions = TransactionStore::load(backend).expect("transactions");

    let operating = accounts.add(new_account("Operating", 50_000.0)).expect("add");
    let reserve = accounts.add(new_account("Reserve", 10_000.0)).expect("add");

    transactions
        .create(
            &mut accounts,
            TransactionDraft::deposit(
                operating.id,
                1_250.75,
                Currency::Usd,
                "Quarterly dividend, \"DEF-12\"",
            ),
        )
        .expect("deposit");
    transactions
        .create(
            &mut accounts,
            TransactionDraft::transfer(operating.id, reserve.id, 500.0, Currency::Usd, "Sweep"),
        )
        .expect("transfer");
    transactions
        .create(
            &mut accounts,
            TransactionDraft::withdrawal(reserve.id, 75.25, Currency::Usd, "Fee settlement"),
        )
        .expect("withdrawal");

    let csv_text = transactions_to_csv(transactions.transactions(), &accounts);

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(
        headers,
        vec![
            "Date",
            "Reference",
            "Type",
            "From Account",
            "To Account",
            "Amount",
            "Currency",
            "Status",
            "Description",
        ]
    );

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("well-formed rows");
    assert_eq!(records.len(), 3);

    let deposit = &records[0];
    assert!(deposit[0].contains('T') && deposit[0].ends_with('Z'));
    assert!(deposit[1].starts_with("TXN-"));
    assert_eq!(&deposit[2], "Deposit");
    assert_eq!(&deposit[3], "");
    assert_eq!(&deposit[4], operating.account_number.as_str());
    assert_eq!(&deposit[5], "1250.75");
    assert_eq!(&deposit[6], "USD");
    assert_eq!(&deposit[7], "Completed");
    // The reader unescapes the doubled quotes back to the original text.
    assert_eq!(&deposit[8], "Quarterly dividend, \"DEF-12\"");

    let transfer = &records[1];
    assert_eq!(&transfer[2], "Transfer");
    assert_eq!(&transfer[3], operating.account_number.as_str());
    assert_eq!(&transfer[4], reserve.account_number.as_str());
    assert_eq!(&transfer[5], "500");

    let withdrawal = &records[2];
    assert_eq!(&withdrawal[2], "Withdrawal");
    assert_eq!(&withdrawal[3], reserve.account_number.as_str());
    assert_eq!(&withdrawal[4], "");
    assert_eq!(&withdrawal[5], "75.25");
}

#[test]
fn every_reference_in_the_export_is_unique() {
    let backend = Arc::new(MemoryStorage::new());
    let mut accounts = AccountStore::load(backend.clone()).expect("accounts");
    let mut transactions = TransactionStore::load(backend).expect("transactions");
    let operating = accounts.add(new_account("Operating", 0.0)).expect("add");

    for i in 0..20 {
        transactions
            .create(
                &mut accounts,
                TransactionDraft::deposit(operating.id, 1.0 + f64::from(i), Currency::Usd, "tick"),
            )
            .expect("deposit");
    }

    let csv_text = transactions_to_csv(transactions.transactions(), &accounts);
    let mut references: Vec<&str> = csv_text
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(1).unwrap_or_default())
        .collect();
    assert_eq!(references.len(), 20);
    references.sort_unstable();
    references.dedup();
    assert_eq!(references.len(), 20, "references must not collide");
}

//! Fixture data installed on first run so a fresh environment has something
//! to show.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::{Account, AccountStatus, AccountType};

/// The five sample accounts a fresh workspace starts with: two USD deposit
/// accounts, a commercial loan, a treasury investment and a EUR operating
/// account. Ids are freshly generated; account numbers are fixed so the
/// fixtures stay recognizable across environments.
pub fn sample_accounts() -> Vec<Account> {
    vec![
        Account {
            id: Uuid::new_v4(),
            account_number: "1234567890".into(),
            name: "Main Checking Account".into(),
            account_type: AccountType::Checking,
            status: AccountStatus::Active,
            currency: Currency::Usd,
            balance: 15_750.50,
            available_balance: Some(15_750.50),
            interest_rate: Some(0.01),
            open_date: date(2023, 1, 15),
            maturity_date: None,
            last_activity_date: Some(instant(2023, 11, 30)),
            notes: Some("Primary transaction account for daily operations".into()),
        },
        Account {
            id: Uuid::new_v4(),
            account_number: "0987654321".into(),
            name: "Reserve Savings".into(),
            account_type: AccountType::Savings,
            status: AccountStatus::Active,
            currency: Currency::Usd,
            balance: 250_000.00,
            available_balance: Some(250_000.00),
            interest_rate: Some(0.5),
            open_date: date(2023, 2, 10),
            maturity_date: None,
            last_activity_date: Some(instant(2023, 11, 15)),
            notes: Some("Emergency fund and short-term liquidity reserve".into()),
        },
        Account {
            id: Uuid::new_v4(),
            account_number: "5647382910".into(),
            name: "Commercial Loan - Office Building".into(),
            account_type: AccountType::Loan,
            status: AccountStatus::Active,
            currency: Currency::Usd,
            balance: -750_000.00,
            available_balance: None,
            interest_rate: Some(4.25),
            open_date: date(2023, 3, 20),
            maturity_date: Some(date(2033, 3, 20)),
            last_activity_date: Some(instant(2023, 11, 20)),
            notes: Some("Commercial real estate loan for downtown office property".into()),
        },
        Account {
            id: Uuid::new_v4(),
            account_number: "1122334455".into(),
            name: "Short-term Treasury Investment".into(),
            account_type: AccountType::Investment,
            status: AccountStatus::Active,
            currency: Currency::Usd,
            balance: 500_000.00,
            available_balance: None,
            interest_rate: Some(2.1),
            open_date: date(2023, 6, 5),
            maturity_date: Some(date(2023, 12, 5)),
            last_activity_date: Some(instant(2023, 6, 5)),
            notes: Some("Six-month Treasury investment for excess liquidity".into()),
        },
        Account {
            id: Uuid::new_v4(),
            account_number: "9988776655".into(),
            name: "Euro Operating Account".into(),
            account_type: AccountType::Checking,
            status: AccountStatus::Active,
            currency: Currency::Eur,
            balance: 125_000.00,
            available_balance: Some(125_000.00),
            interest_rate: Some(0.0),
            open_date: date(2023, 4, 12),
            maturity_date: None,
            last_activity_date: Some(instant(2023, 11, 28)),
            notes: Some("Main operating account for European transactions".into()),
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    date(year, month, day)
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

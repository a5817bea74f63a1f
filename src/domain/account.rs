use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::common::{Displayable, Identifiable};

/// Represents a financial account held at the institution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub account_number: String,
    pub name: String,
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub currency: Currency,
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    pub open_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Caller-supplied fields for a new account; id and account number are
/// assigned on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub currency: Currency,
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    pub open_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Account {
    /// Materializes an account from caller input, assigning a fresh id and a
    /// generated account number.
    pub fn from_new(new: NewAccount) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number: generate_account_number(),
            name: new.name,
            account_type: new.account_type,
            status: new.status,
            currency: new.currency,
            balance: new.balance,
            available_balance: new.available_balance,
            interest_rate: new.interest_rate,
            open_date: new.open_date,
            maturity_date: new.maturity_date,
            last_activity_date: new.last_activity_date,
            notes: new.notes,
        }
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!(
            "{} ·{} ({})",
            self.name,
            &self.account_number[self.account_number.len().saturating_sub(4)..],
            self.account_type.label()
        )
    }
}

/// Produces a random ten-digit account number.
pub fn generate_account_number() -> String {
    let mut rng = rand::thread_rng();
    (0..10).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountType {
    Checking,
    Savings,
    Loan,
    Mortgage,
    Investment,
    Certificate,
    CreditLine,
    Other,
}

impl AccountType {
    /// Human-readable label, as shown in listings and exports.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::Loan => "Loan",
            AccountType::Mortgage => "Mortgage",
            AccountType::Investment => "Investment",
            AccountType::Certificate => "Certificate",
            AccountType::CreditLine => "Credit Line",
            AccountType::Other => "Other",
        }
    }
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Inactive,
    Closed,
    Frozen,
    Pending,
}

impl AccountStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Inactive => "Inactive",
            AccountStatus::Closed => "Closed",
            AccountStatus::Frozen => "Frozen",
            AccountStatus::Pending => "Pending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new() -> NewAccount {
        NewAccount {
            name: "Main Checking Account".into(),
            account_type: AccountType::Checking,
            status: AccountStatus::Active,
            currency: Currency::Usd,
            balance: 15_750.50,
            available_balance: Some(15_750.50),
            interest_rate: Some(0.01),
            open_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            maturity_date: None,
            last_activity_date: None,
            notes: None,
        }
    }

    #[test]
    fn from_new_assigns_id_and_number() {
        let account = Account::from_new(sample_new());
        assert_eq!(account.account_number.len(), 10);
        assert!(account.account_number.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(account.name, "Main Checking Account");

        let other = Account::from_new(sample_new());
        assert_ne!(account.id, other.id);
    }

    #[test]
    fn serde_omits_absent_optionals() {
        let mut account = Account::from_new(sample_new());
        account.maturity_date = None;
        account.notes = None;
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("maturity_date"));
        assert!(!json.contains("notes"));

        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn credit_line_label_has_space() {
        assert_eq!(AccountType::CreditLine.label(), "Credit Line");
        assert_eq!(AccountType::Checking.label(), "Checking");
    }
}

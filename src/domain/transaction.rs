use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::common::{Displayable, Identifiable};

/// A movement of funds recorded against one or two accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<Uuid>,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

/// Caller-supplied fields for a transaction that has not been validated or
/// posted yet. Id, reference, status and timestamp are assigned on posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDraft {
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<Uuid>,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl TransactionDraft {
    /// Draft for a deposit into `to_account`.
    pub fn deposit(
        to_account: Uuid,
        amount: f64,
        currency: Currency,
        description: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type: TransactionType::Deposit,
            from_account: None,
            to_account: Some(to_account),
            amount,
            currency,
            description: description.into(),
            metadata: None,
        }
    }

    /// Draft for a withdrawal out of `from_account`.
    pub fn withdrawal(
        from_account: Uuid,
        amount: f64,
        currency: Currency,
        description: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type: TransactionType::Withdrawal,
            from_account: Some(from_account),
            to_account: None,
            amount,
            currency,
            description: description.into(),
            metadata: None,
        }
    }

    /// Draft for a transfer between two accounts.
    pub fn transfer(
        from_account: Uuid,
        to_account: Uuid,
        amount: f64,
        currency: Currency,
        description: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type: TransactionType::Transfer,
            from_account: Some(from_account),
            to_account: Some(to_account),
            amount,
            currency,
            description: description.into(),
            metadata: None,
        }
    }
}

impl Transaction {
    /// Finalizes a validated draft: assigns id and reference, stamps the
    /// timestamp and marks the transaction completed.
    pub fn from_draft(draft: TransactionDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_type: draft.transaction_type,
            status: TransactionStatus::Completed,
            from_account: draft.from_account,
            to_account: draft.to_account,
            amount: draft.amount,
            currency: draft.currency,
            description: draft.description,
            timestamp,
            reference: generate_reference(timestamp),
            metadata: draft.metadata,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} {}",
            self.reference,
            self.transaction_type.label(),
            self.amount,
            self.currency.code()
        )
    }
}

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Builds a reference in the form `TXN-<millis base36>-<6 random base36>`.
pub fn generate_reference(timestamp: DateTime<Utc>) -> String {
    let millis = timestamp.timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("TXN-{}-{}", to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Enumerates the supported transaction kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Interest,
    Fee,
    LoanDisbursement,
    LoanPayment,
}

impl TransactionType {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Transfer => "Transfer",
            TransactionType::Interest => "Interest",
            TransactionType::Fee => "Fee",
            TransactionType::LoanDisbursement => "Loan Disbursement",
            TransactionType::LoanPayment => "Loan Payment",
        }
    }
}

/// Processing state of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Cancelled => "Cancelled",
        }
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::transaction::{Transaction, TransactionDraft, TransactionStatus, TransactionType};
use crate::errors::{StoreError, StoreResult, TransactionError};
use crate::storage::{load_snapshot, save_snapshot, StorageBackend};

use super::AccountStore;

pub const TRANSACTIONS_NAMESPACE: &str = "transactions";

/// Validates and records transactions. This store is the only writer of
/// account balances, which it mutates through [`AccountStore`].
pub struct TransactionStore {
    backend: Arc<dyn StorageBackend>,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Rehydrates the store from its namespace, starting empty when nothing
    /// has been persisted yet.
    pub fn load(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let transactions =
            load_snapshot(backend.as_ref(), TRANSACTIONS_NAMESPACE)?.unwrap_or_default();
        Ok(Self { backend, transactions })
    }

    /// Validates the draft against the current accounts and, on success,
    /// posts it: assigns id, reference and timestamp, marks it Completed,
    /// applies the balance effect and appends the record.
    ///
    /// Taking both stores by `&mut` makes the validate-then-apply pair one
    /// atomic unit: no other mutation can interleave between the balance
    /// check and the balance update.
    pub fn create(
        &mut self,
        accounts: &mut AccountStore,
        draft: TransactionDraft,
    ) -> Result<Transaction, TransactionError> {
        if let Err(error) = validate(accounts, &draft) {
            warn!(%error, kind = draft.transaction_type.label(), "transaction rejected");
            return Err(error);
        }
        let txn = Transaction::from_draft(draft, Utc::now());
        accounts.apply_posting(&txn)?;
        self.transactions.push(txn.clone());
        self.persist()?;
        debug!(reference = %txn.reference, "transaction posted");
        Ok(txn)
    }

    /// In-place status change. Balance effects of an already-posted
    /// transaction are deliberately not reversed when it is later marked
    /// Failed or Cancelled.
    pub fn update_status(&mut self, id: Uuid, status: TransactionStatus) -> StoreResult<()> {
        match self.transactions.iter_mut().find(|txn| txn.id == id) {
            Some(txn) => txn.status = status,
            None => return Err(StoreError::not_found("transaction", id)),
        }
        self.persist()
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// All transactions where the account is source or destination.
    pub fn transactions_for_account(&self, account_id: Uuid) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| {
                txn.from_account == Some(account_id) || txn.to_account == Some(account_id)
            })
            .collect()
    }

    pub fn transactions_by_type(&self, transaction_type: TransactionType) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.transaction_type == transaction_type)
            .collect()
    }

    pub fn transactions_by_status(&self, status: TransactionStatus) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.status == status)
            .collect()
    }

    /// Transactions stamped within the inclusive `[start, end]` window.
    pub fn transactions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.timestamp >= start && txn.timestamp <= end)
            .collect()
    }

    /// Case-insensitive substring search over reference, description, type
    /// and status. An empty query returns the full collection.
    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.transactions.iter().collect();
        }
        self.transactions
            .iter()
            .filter(|txn| transaction_matches(txn, &needle))
            .collect()
    }

    /// Drops every transaction and removes the backing namespace.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.transactions.clear();
        self.backend.remove(TRANSACTIONS_NAMESPACE)
    }

    fn persist(&self) -> StoreResult<()> {
        save_snapshot(self.backend.as_ref(), TRANSACTIONS_NAMESPACE, &self.transactions)
    }
}

fn transaction_matches(txn: &Transaction, needle: &str) -> bool {
    txn.reference.to_lowercase().contains(needle)
        || txn.description.to_lowercase().contains(needle)
        || txn.transaction_type.label().to_lowercase().contains(needle)
        || txn.status.label().to_lowercase().contains(needle)
}

/// Checks a draft against the account collection without mutating anything.
/// The first failing rule wins; rules run in a fixed order so callers see
/// stable messages.
fn validate(accounts: &AccountStore, draft: &TransactionDraft) -> Result<(), TransactionError> {
    if draft.amount <= 0.0 {
        return Err(TransactionError::NonPositiveAmount);
    }

    if draft.transaction_type == TransactionType::Transfer {
        let (from_id, to_id) = match (draft.from_account, draft.to_account) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(TransactionError::MissingTransferAccounts),
        };
        if from_id == to_id {
            return Err(TransactionError::SameAccount);
        }
        let from = accounts
            .account(from_id)
            .ok_or(TransactionError::UnknownAccount(from_id))?;
        let to = accounts
            .account(to_id)
            .ok_or(TransactionError::UnknownAccount(to_id))?;
        if from.currency != draft.currency || to.currency != draft.currency {
            return Err(TransactionError::CurrencyMismatch);
        }
        if from.balance < draft.amount {
            return Err(TransactionError::InsufficientBalance);
        }
    }

    if draft.transaction_type == TransactionType::Withdrawal {
        let from_id = draft
            .from_account
            .ok_or(TransactionError::MissingSourceAccount)?;
        let from = accounts
            .account(from_id)
            .ok_or(TransactionError::UnknownAccount(from_id))?;
        if from.balance < draft.amount {
            return Err(TransactionError::InsufficientBalance);
        }
    }

    Ok(())
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::transaction::{Transaction, TransactionType};
use crate::domain::{Account, AccountStatus, AccountType, NewAccount};
use crate::errors::{StoreError, StoreResult};
use crate::storage::{load_snapshot, save_snapshot, StorageBackend};

use super::{remove_by_id, replace_by_id};

pub const ACCOUNTS_NAMESPACE: &str = "accounts";

/// Owns the account collection and is the sole authority for balance
/// mutation. Every mutating call writes the full collection through to the
/// backend before returning.
pub struct AccountStore {
    backend: Arc<dyn StorageBackend>,
    accounts: Vec<Account>,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("accounts", &self.accounts)
            .finish_non_exhaustive()
    }
}

impl AccountStore {
    /// Rehydrates the store from its namespace, starting empty when nothing
    /// has been persisted yet.
    pub fn load(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let accounts = load_snapshot(backend.as_ref(), ACCOUNTS_NAMESPACE)?.unwrap_or_default();
        Ok(Self { backend, accounts })
    }

    /// Creates an account from caller input, assigning id and account number.
    pub fn add(&mut self, new: NewAccount) -> StoreResult<Account> {
        let account = Account::from_new(new);
        self.accounts.push(account.clone());
        self.persist()?;
        debug!(account = %account.account_number, "account added");
        Ok(account)
    }

    /// Inserts fully-formed accounts, keeping their ids and numbers. Seeding
    /// uses this to install fixture accounts with recognizable numbers.
    pub fn insert_all(&mut self, accounts: Vec<Account>) -> StoreResult<()> {
        self.accounts.extend(accounts);
        self.persist()
    }

    /// Replaces the stored record whose id matches.
    pub fn update(&mut self, account: Account) -> StoreResult<()> {
        let id = account.id;
        if !replace_by_id(&mut self.accounts, account) {
            return Err(StoreError::not_found("account", id));
        }
        self.persist()
    }

    /// Removes and returns the account with the given id. Historical
    /// transactions referencing it are left dangling by design.
    pub fn remove(&mut self, id: Uuid) -> StoreResult<Account> {
        let removed =
            remove_by_id(&mut self.accounts, id).ok_or_else(|| StoreError::not_found("account", id))?;
        self.persist()?;
        Ok(removed)
    }

    pub fn set_status(&mut self, id: Uuid, status: AccountStatus) -> StoreResult<()> {
        match self.account_mut(id) {
            Some(account) => account.status = status,
            None => return Err(StoreError::not_found("account", id)),
        }
        self.persist()
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn accounts_by_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|account| account.account_type == account_type)
            .collect()
    }

    pub fn accounts_by_status(&self, status: AccountStatus) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|account| account.status == status)
            .collect()
    }

    /// Sum of balances across accounts held in the given currency.
    pub fn total_balance(&self, currency: Currency) -> f64 {
        self.accounts
            .iter()
            .filter(|account| account.currency == currency)
            .map(|account| account.balance)
            .sum()
    }

    /// Case-insensitive substring search over account number, name, type,
    /// status and notes. An empty query returns the full collection in
    /// original order.
    pub fn search(&self, query: &str) -> Vec<&Account> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.accounts.iter().collect();
        }
        self.accounts
            .iter()
            .filter(|account| account_matches(account, &needle))
            .collect()
    }

    /// Drops every account and removes the backing namespace.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.accounts.clear();
        self.backend.remove(ACCOUNTS_NAMESPACE)
    }

    /// Applies the balance effect of a posted transaction. Transfer debits
    /// the source and credits the destination, Withdrawal debits, Deposit
    /// credits; every other kind records without touching balances. Touched
    /// accounts get their last-activity date stamped from the transaction.
    pub(crate) fn apply_posting(&mut self, txn: &Transaction) -> StoreResult<()> {
        match txn.transaction_type {
            TransactionType::Transfer => {
                self.adjust_balance(txn.from_account, -txn.amount, txn.timestamp);
                self.adjust_balance(txn.to_account, txn.amount, txn.timestamp);
            }
            TransactionType::Withdrawal => {
                self.adjust_balance(txn.from_account, -txn.amount, txn.timestamp);
            }
            TransactionType::Deposit => {
                self.adjust_balance(txn.to_account, txn.amount, txn.timestamp);
            }
            _ => return Ok(()),
        }
        self.persist()
    }

    fn adjust_balance(&mut self, id: Option<Uuid>, delta: f64, at: DateTime<Utc>) {
        if let Some(account) = id.and_then(|id| self.account_mut(id)) {
            account.balance += delta;
            account.last_activity_date = Some(at);
        }
    }

    fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    fn persist(&self) -> StoreResult<()> {
        save_snapshot(self.backend.as_ref(), ACCOUNTS_NAMESPACE, &self.accounts)
    }
}

fn account_matches(account: &Account, needle: &str) -> bool {
    account.account_number.contains(needle)
        || account.name.to_lowercase().contains(needle)
        || account.account_type.label().to_lowercase().contains(needle)
        || account.status.label().to_lowercase().contains(needle)
        || account
            .notes
            .as_deref()
            .map(|notes| notes.to_lowercase().contains(needle))
            .unwrap_or(false)
}

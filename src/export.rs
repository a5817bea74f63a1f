//! CSV rendering of transaction history.

use chrono::SecondsFormat;
use uuid::Uuid;

use crate::domain::transaction::Transaction;
use crate::stores::AccountStore;

pub const CSV_HEADER: &str =
    "Date,Reference,Type,From Account,To Account,Amount,Currency,Status,Description";

/// Renders transactions as CSV, one row per transaction in the order given,
/// so callers can export exactly what a filtered view shows.
///
/// Account ids resolve to account numbers; ids that no longer resolve render
/// as empty fields. The description is the only free-text column and is
/// always double-quoted, with embedded quotes doubled.
pub fn transactions_to_csv(transactions: &[Transaction], accounts: &AccountStore) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + transactions.len() * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for txn in transactions {
        out.push_str(&render_row(txn, accounts));
        out.push('\n');
    }
    out
}

fn render_row(txn: &Transaction, accounts: &AccountStore) -> String {
    format!(
        "{},{},{},{},{},{},{},{},\"{}\"",
        txn.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        txn.reference,
        txn.transaction_type.label(),
        account_number(accounts, txn.from_account),
        account_number(accounts, txn.to_account),
        txn.amount,
        txn.currency.code(),
        txn.status.label(),
        txn.description.replace('"', "\"\""),
    )
}

fn account_number(accounts: &AccountStore, id: Option<Uuid>) -> String {
    id.and_then(|id| accounts.account(id))
        .map(|account| account.account_number.clone())
        .unwrap_or_default()
}

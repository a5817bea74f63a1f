pub mod account_store;
pub mod asset_store;
pub mod risk_store;
pub mod transaction_store;

use uuid::Uuid;

use crate::domain::Identifiable;

pub use account_store::{AccountStore, ACCOUNTS_NAMESPACE};
pub use asset_store::{AssetStore, ASSETS_NAMESPACE};
pub use risk_store::{RiskStore, RISK_NAMESPACE};
pub use transaction_store::{TransactionStore, TRANSACTIONS_NAMESPACE};

/// Replaces the element whose id matches `updated`, returning false when no
/// element matches.
pub(crate) fn replace_by_id<T: Identifiable>(items: &mut [T], updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Removes and returns the element with the given id, if present.
pub(crate) fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

use thiserror::Error;
use uuid::Uuid;

/// Convenience alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures raised by the persistence-backed entity stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Validation and application failures for transaction creation.
///
/// Every variant carries a message meant to be shown to the end user as-is;
/// none of them leaves any store mutated.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction amount must be greater than zero")]
    NonPositiveAmount,
    #[error("both source and destination accounts are required for transfers")]
    MissingTransferAccounts,
    #[error("source account is required for withdrawals")]
    MissingSourceAccount,
    #[error("source and destination accounts must be different")]
    SameAccount,
    #[error("unknown account `{0}`")]
    UnknownAccount(Uuid),
    #[error("currency mismatch between account and transaction")]
    CurrencyMismatch,
    #[error("insufficient balance in source account")]
    InsufficientBalance,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures raised by the local auth flow and the token-based API client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with email `{0}` already exists")]
    DuplicateEmail(String),
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),
    #[error("no authentication token found")]
    MissingToken,
    #[error("authentication token expired")]
    TokenExpired,
    #[error("request to `{path}` failed with status {status}")]
    RequestFailed { path: String, status: u16 },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

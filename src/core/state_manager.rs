use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::api::API_TOKEN_NAMESPACE;
use crate::auth::{ApiClient, AuthStore};
use crate::config::{Config, ConfigManager};
use crate::demo;
use crate::domain::risk::{RiskAssessment, RiskMetrics};
use crate::domain::transaction::{Transaction, TransactionDraft};
use crate::errors::{AuthError, StoreError, StoreResult, TransactionError};
use crate::export;
use crate::storage::{JsonStorage, StorageBackend};
use crate::stores::{AccountStore, AssetStore, RiskStore, TransactionStore};

/// Facade that owns configuration and every domain store, wiring them all to
/// one storage backend so the whole dashboard state lives under a single
/// data directory.
///
/// Cross-store operations (transaction posting, risk refreshes, CSV export)
/// go through here; single-store work uses the public store fields directly.
pub struct StateManager {
    backend: Arc<dyn StorageBackend>,
    config_manager: ConfigManager,
    config: Config,
    pub accounts: AccountStore,
    pub transactions: TransactionStore,
    pub risk: RiskStore,
    pub assets: AssetStore,
    pub auth: AuthStore,
}

impl StateManager {
    /// Opens the state rooted in the default application data directory,
    /// seeding the sample accounts on first run.
    pub fn new() -> StoreResult<Self> {
        let backend = Arc::new(JsonStorage::new_default()?);
        Self::build(backend, ConfigManager::new()?)
    }

    /// Opens the state under an explicit base directory. Tests point this at
    /// a scratch directory.
    pub fn with_root(root: PathBuf) -> StoreResult<Self> {
        let backend = Arc::new(JsonStorage::new(Some(root.clone()))?);
        Self::build(backend, ConfigManager::with_base(root)?)
    }

    fn build(
        backend: Arc<dyn StorageBackend>,
        config_manager: ConfigManager,
    ) -> StoreResult<Self> {
        let config = config_manager.load()?;
        let accounts = AccountStore::load(backend.clone())?;
        let transactions = TransactionStore::load(backend.clone())?;
        let risk = RiskStore::load(backend.clone())?;
        let assets = AssetStore::load(backend.clone())?;
        let auth = AuthStore::load(backend.clone(), config.simulated_latency())?;

        let mut manager = Self {
            backend,
            config_manager,
            config,
            accounts,
            transactions,
            risk,
            assets,
            auth,
        };
        manager.seed_if_empty()?;
        Ok(manager)
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Persists a new configuration and applies it to the running stores.
    pub fn update_config(&mut self, config: Config) -> StoreResult<()> {
        self.config_manager.save(&config)?;
        self.auth.set_latency(config.simulated_latency());
        self.config = config;
        Ok(())
    }

    /// Builds a fresh API client against the configured base URL, sharing
    /// this manager's backend for token storage.
    pub fn api_client(&self) -> Result<ApiClient, AuthError> {
        ApiClient::new(self.backend.clone(), self.config.api_base_url.clone())
    }

    /// Validates and posts a transaction, applying its balance effects to the
    /// account store in the same call.
    pub fn create_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> Result<Transaction, TransactionError> {
        self.transactions.create(&mut self.accounts, draft)
    }

    /// Re-scores one account under every risk category, replacing its stored
    /// assessments.
    pub fn refresh_account_risk(&mut self, account_id: Uuid) -> StoreResult<Vec<RiskAssessment>> {
        let account = self
            .accounts
            .account(account_id)
            .ok_or_else(|| StoreError::not_found("account", account_id))?;
        self.risk.refresh_account(account, self.config.base_currency)
    }

    /// Re-scores the whole portfolio in one pass.
    pub fn refresh_portfolio_risk(&mut self) -> StoreResult<()> {
        self.risk
            .refresh_portfolio(self.accounts.accounts(), self.config.base_currency)
    }

    /// Current portfolio-wide risk metrics, computed without touching stored
    /// assessments.
    pub fn portfolio_risk(&self) -> RiskMetrics {
        self.risk
            .portfolio_metrics(self.accounts.accounts(), self.config.base_currency)
    }

    /// Renders the full transaction history as CSV.
    pub fn export_transactions_csv(&self) -> String {
        export::transactions_to_csv(self.transactions.transactions(), &self.accounts)
    }

    /// Clears every namespace and reinstalls the sample accounts, returning
    /// the environment to its first-run shape.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.accounts.clear()?;
        self.transactions.clear()?;
        self.risk.clear()?;
        self.assets.clear()?;
        self.auth.clear()?;
        self.backend.remove(API_TOKEN_NAMESPACE)?;
        info!("state reset");
        self.seed_if_empty()
    }

    fn seed_if_empty(&mut self) -> StoreResult<()> {
        if self.accounts.is_empty() {
            self.accounts.insert_all(demo::sample_accounts())?;
            info!("seeded sample accounts");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use tempfile::TempDir;

    fn manager() -> (StateManager, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let manager = StateManager::with_root(dir.path().to_path_buf()).expect("manager");
        (manager, dir)
    }

    #[test]
    fn first_run_seeds_sample_accounts() {
        let (manager, _dir) = manager();
        assert_eq!(manager.accounts.accounts().len(), 5);
        assert_eq!(manager.config().base_currency, Currency::Usd);
    }

    #[test]
    fn reopening_does_not_reseed() {
        let dir = TempDir::new().expect("temp dir");
        let root = dir.path().to_path_buf();

        let mut first = StateManager::with_root(root.clone()).expect("manager");
        let doomed = first.accounts.accounts()[0].id;
        first.accounts.remove(doomed).expect("remove");
        assert_eq!(first.accounts.accounts().len(), 4);

        let second = StateManager::with_root(root).expect("reopen");
        assert_eq!(second.accounts.accounts().len(), 4);
    }

    #[test]
    fn transfer_moves_balance_between_seeded_accounts() {
        let (mut manager, _dir) = manager();
        let from = manager.accounts.accounts()[0].id;
        let to = manager.accounts.accounts()[1].id;

        let draft = TransactionDraft::transfer(from, to, 750.50, Currency::Usd, "Sweep");
        let txn = manager.create_transaction(draft).expect("transfer");

        assert_eq!(manager.accounts.account(from).map(|a| a.balance), Some(15_000.00));
        assert_eq!(manager.accounts.account(to).map(|a| a.balance), Some(250_750.50));
        assert_eq!(manager.transactions.transaction(txn.id).map(|t| t.amount), Some(750.50));
    }

    #[test]
    fn refresh_account_risk_requires_a_known_account() {
        let (mut manager, _dir) = manager();
        let err = manager.refresh_account_risk(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "account", .. }));

        let id = manager.accounts.accounts()[0].id;
        let assessments = manager.refresh_account_risk(id).expect("refresh");
        assert_eq!(assessments.len(), 5);
    }

    #[test]
    fn portfolio_risk_reflects_the_seeded_book() {
        let (manager, _dir) = manager();
        let metrics = manager.portfolio_risk();
        assert!(metrics.overall > 0.0);
        assert!(metrics.overall <= 100.0);
        // Seeded book holds a large loan, so credit sits below a clean slate.
        assert!(metrics.credit < 100.0);
    }

    #[test]
    fn reset_returns_to_first_run_shape() {
        let (mut manager, _dir) = manager();
        let from = manager.accounts.accounts()[0].id;
        let to = manager.accounts.accounts()[1].id;
        manager
            .create_transaction(TransactionDraft::transfer(from, to, 10.0, Currency::Usd, "x"))
            .expect("transfer");
        manager.refresh_portfolio_risk().expect("refresh");

        manager.reset().expect("reset");
        assert_eq!(manager.accounts.accounts().len(), 5);
        assert!(manager.transactions.transactions().is_empty());
        assert!(manager.risk.assessments().is_empty());
        assert_eq!(
            manager.accounts.accounts()[0].balance,
            demo::sample_accounts()[0].balance
        );
    }

    #[test]
    fn update_config_persists_across_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let root = dir.path().to_path_buf();

        let mut manager = StateManager::with_root(root.clone()).expect("manager");
        let mut config = manager.config().clone();
        config.base_currency = Currency::Eur;
        config.simulated_latency_ms = 0;
        manager.update_config(config).expect("update");

        let reopened = StateManager::with_root(root).expect("reopen");
        assert_eq!(reopened.config().base_currency, Currency::Eur);
        assert_eq!(reopened.config().simulated_latency_ms, 0);
    }
}

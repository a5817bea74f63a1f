use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::account::Account;
use crate::domain::risk::{RiskAssessment, RiskCategory, RiskLevel, RiskMetrics};
use crate::errors::{StoreError, StoreResult};
use crate::scoring;
use crate::storage::{load_snapshot, save_snapshot, StorageBackend};

use super::replace_by_id;

pub const RISK_NAMESPACE: &str = "risk_assessments";

/// Records and queries risk assessments. Scoring itself lives in
/// [`crate::scoring`] as pure functions; recording a result is an explicit
/// operation on this store.
pub struct RiskStore {
    backend: Arc<dyn StorageBackend>,
    assessments: Vec<RiskAssessment>,
}

impl RiskStore {
    /// Rehydrates the store from its namespace, starting empty when nothing
    /// has been persisted yet.
    pub fn load(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let assessments = load_snapshot(backend.as_ref(), RISK_NAMESPACE)?.unwrap_or_default();
        Ok(Self { backend, assessments })
    }

    /// Appends a single assessment as-is. Recording never dedupes earlier
    /// assessments for the same account or category.
    pub fn record(&mut self, assessment: RiskAssessment) -> StoreResult<()> {
        self.assessments.push(assessment);
        self.persist()
    }

    /// Appends a batch of assessments, persisting once. Pairs with
    /// [`scoring::score_account`] when the caller wants accumulating history
    /// instead of the replacing refresh.
    pub fn record_all(&mut self, assessments: Vec<RiskAssessment>) -> StoreResult<()> {
        self.assessments.extend(assessments);
        self.persist()
    }

    /// Scores the account under every category and replaces its previously
    /// recorded assessments with the fresh set, so repeated refreshes do not
    /// accumulate duplicates.
    pub fn refresh_account(
        &mut self,
        account: &Account,
        base_currency: Currency,
    ) -> StoreResult<Vec<RiskAssessment>> {
        let now = Utc::now();
        let fresh = scoring::score_account(account, base_currency, now.date_naive(), now);
        self.assessments
            .retain(|assessment| assessment.account_id != account.id);
        self.assessments.extend(fresh.iter().cloned());
        self.persist()?;
        debug!(account = %account.account_number, "risk assessments refreshed");
        Ok(fresh)
    }

    /// Refreshes every given account in one pass, persisting once.
    pub fn refresh_portfolio(
        &mut self,
        accounts: &[Account],
        base_currency: Currency,
    ) -> StoreResult<()> {
        let now = Utc::now();
        let today = now.date_naive();
        for account in accounts {
            self.assessments
                .retain(|assessment| assessment.account_id != account.id);
            self.assessments
                .extend(scoring::score_account(account, base_currency, today, now));
        }
        self.persist()
    }

    /// Replaces a stored assessment whose id matches.
    pub fn update(&mut self, assessment: RiskAssessment) -> StoreResult<()> {
        let id = assessment.id;
        if !replace_by_id(&mut self.assessments, assessment) {
            return Err(StoreError::not_found("risk assessment", id));
        }
        self.persist()
    }

    /// Portfolio-level metrics over the given accounts. Always recomputed,
    /// never persisted.
    pub fn portfolio_metrics(&self, accounts: &[Account], base_currency: Currency) -> RiskMetrics {
        scoring::score_portfolio(accounts, base_currency, Utc::now().date_naive())
    }

    pub fn assessments(&self) -> &[RiskAssessment] {
        &self.assessments
    }

    pub fn assessments_for_account(&self, account_id: Uuid) -> Vec<&RiskAssessment> {
        self.assessments
            .iter()
            .filter(|assessment| assessment.account_id == account_id)
            .collect()
    }

    pub fn assessments_by_category(&self, category: RiskCategory) -> Vec<&RiskAssessment> {
        self.assessments
            .iter()
            .filter(|assessment| assessment.category == category)
            .collect()
    }

    pub fn assessments_by_level(&self, level: RiskLevel) -> Vec<&RiskAssessment> {
        self.assessments
            .iter()
            .filter(|assessment| assessment.level == level)
            .collect()
    }

    /// Drops every assessment and removes the backing namespace.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.assessments.clear();
        self.backend.remove(RISK_NAMESPACE)
    }

    fn persist(&self) -> StoreResult<()> {
        save_snapshot(self.backend.as_ref(), RISK_NAMESPACE, &self.assessments)
    }
}

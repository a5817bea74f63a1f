use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::asset::{
    Asset, AssetPerformance, AssetStatus, AssetType, NewAsset, PortfolioMetrics,
};
use crate::errors::{StoreError, StoreResult};
use crate::storage::{load_snapshot, save_snapshot, StorageBackend};

use super::{remove_by_id, replace_by_id};

pub const ASSETS_NAMESPACE: &str = "assets";

/// Owns the portfolio holdings; no coupling to accounts or transactions.
/// Metrics are derived on demand and never persisted.
pub struct AssetStore {
    backend: Arc<dyn StorageBackend>,
    assets: Vec<Asset>,
}

impl AssetStore {
    /// Rehydrates the store from its namespace, starting empty when nothing
    /// has been persisted yet.
    pub fn load(backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let assets = load_snapshot(backend.as_ref(), ASSETS_NAMESPACE)?.unwrap_or_default();
        Ok(Self { backend, assets })
    }

    pub fn add(&mut self, new: NewAsset) -> StoreResult<Asset> {
        let asset = Asset::from_new(new);
        self.assets.push(asset.clone());
        self.persist()?;
        Ok(asset)
    }

    pub fn update(&mut self, asset: Asset) -> StoreResult<()> {
        let id = asset.id;
        if !replace_by_id(&mut self.assets, asset) {
            return Err(StoreError::not_found("asset", id));
        }
        self.persist()
    }

    pub fn remove(&mut self, id: Uuid) -> StoreResult<Asset> {
        let removed =
            remove_by_id(&mut self.assets, id).ok_or_else(|| StoreError::not_found("asset", id))?;
        self.persist()?;
        Ok(removed)
    }

    /// Revalues a holding, stamping the valuation date.
    pub fn update_value(&mut self, id: Uuid, new_value: f64) -> StoreResult<()> {
        match self.assets.iter_mut().find(|asset| asset.id == id) {
            Some(asset) => {
                asset.current_value = new_value;
                asset.last_valuation_date = Utc::now();
            }
            None => return Err(StoreError::not_found("asset", id)),
        }
        self.persist()
    }

    pub fn asset(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn assets_by_type(&self, asset_type: AssetType) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|asset| asset.asset_type == asset_type)
            .collect()
    }

    pub fn assets_by_status(&self, status: AssetStatus) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|asset| asset.status == status)
            .collect()
    }

    /// Sum of current values across all holdings.
    pub fn total_value(&self) -> f64 {
        self.assets.iter().map(|asset| asset.current_value).sum()
    }

    /// Percentage of total value held per asset type. Empty when the
    /// portfolio has no value, so no share is ever NaN.
    pub fn allocation(&self) -> BTreeMap<AssetType, f64> {
        let total = self.total_value();
        let mut allocation = BTreeMap::new();
        if total == 0.0 {
            return allocation;
        }
        for asset in &self.assets {
            *allocation.entry(asset.asset_type).or_insert(0.0) +=
                asset.current_value / total * 100.0;
        }
        allocation
    }

    /// Return metrics for one holding, valued as of today.
    pub fn asset_performance(&self, id: Uuid) -> Option<AssetPerformance> {
        self.asset_performance_at(id, Utc::now().date_naive())
    }

    /// Return metrics for one holding as of the given date.
    pub fn asset_performance_at(&self, id: Uuid, today: NaiveDate) -> Option<AssetPerformance> {
        let asset = self.asset(id)?;
        let unrealized_gains = asset.unrealized_gain();
        let total_return = simple_return(asset);
        Some(AssetPerformance {
            total_return,
            annualized_return: total_return / holding_years(asset.purchase_date, today),
            unrealized_gains,
        })
    }

    /// Valuation, allocation and performance rollup, valued as of today.
    pub fn portfolio_metrics(&self) -> PortfolioMetrics {
        self.portfolio_metrics_at(Utc::now().date_naive())
    }

    /// Valuation, allocation and performance rollup as of the given date.
    /// Per-asset annualized returns enter as a simple arithmetic mean, not
    /// value-weighted.
    pub fn portfolio_metrics_at(&self, today: NaiveDate) -> PortfolioMetrics {
        let total_value = self.total_value();
        let mut performance = AssetPerformance::default();
        for asset in &self.assets {
            performance.unrealized_gains += asset.unrealized_gain();
            performance.annualized_return +=
                simple_return(asset) / holding_years(asset.purchase_date, today);
        }
        if !self.assets.is_empty() {
            performance.annualized_return /= self.assets.len() as f64;
        }
        if total_value != 0.0 {
            performance.total_return = performance.unrealized_gains / total_value * 100.0;
        }
        PortfolioMetrics {
            total_value,
            allocation: self.allocation(),
            performance,
        }
    }

    /// Drops every holding and removes the backing namespace.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.assets.clear();
        self.backend.remove(ASSETS_NAMESPACE)
    }

    fn persist(&self) -> StoreResult<()> {
        save_snapshot(self.backend.as_ref(), ASSETS_NAMESPACE, &self.assets)
    }
}

/// Percentage return over the purchase price; zero when the purchase price
/// is zero, so the ratio never blows up.
fn simple_return(asset: &Asset) -> f64 {
    if asset.purchase_price == 0.0 {
        return 0.0;
    }
    (asset.current_value / asset.purchase_price - 1.0) * 100.0
}

/// Holding period in years, with the day count floored at one so same-day
/// purchases yield a finite annualized return.
fn holding_years(purchase_date: NaiveDate, today: NaiveDate) -> f64 {
    (today - purchase_date).num_days().max(1) as f64 / 365.0
}

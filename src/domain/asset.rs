use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::common::{Displayable, Identifiable};

/// A holding tracked independently of the account ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub asset_type: AssetType,
    pub status: AssetStatus,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
    pub current_value: f64,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_valuation_date: DateTime<Utc>,
}

/// Caller-supplied fields for a new asset; the id is assigned on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub asset_type: AssetType,
    pub status: AssetStatus,
    pub purchase_date: NaiveDate,
    pub purchase_price: f64,
    pub current_value: f64,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_valuation_date: DateTime<Utc>,
}

impl Asset {
    /// Materializes an asset from caller input with a fresh id.
    pub fn from_new(new: NewAsset) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            asset_type: new.asset_type,
            status: new.status,
            purchase_date: new.purchase_date,
            purchase_price: new.purchase_price,
            current_value: new.current_value,
            currency: new.currency,
            maturity_date: new.maturity_date,
            interest_rate: new.interest_rate,
            location: new.location,
            description: new.description,
            tags: new.tags,
            last_valuation_date: new.last_valuation_date,
        }
    }

    /// Gain or loss relative to the purchase price.
    pub fn unrealized_gain(&self) -> f64 {
        self.current_value - self.purchase_price
    }
}

impl Identifiable for Asset {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Asset {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.asset_type.label())
    }
}

/// Classes of holdings the portfolio distinguishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetType {
    Cash,
    Bonds,
    Stocks,
    RealEstate,
    Commodities,
    Other,
}

impl AssetType {
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Cash => "Cash",
            AssetType::Bonds => "Bonds",
            AssetType::Stocks => "Stocks",
            AssetType::RealEstate => "Real Estate",
            AssetType::Commodities => "Commodities",
            AssetType::Other => "Other",
        }
    }
}

/// Lifecycle state of a holding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetStatus {
    Active,
    Pending,
    Matured,
    Sold,
}

impl AssetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssetStatus::Active => "Active",
            AssetStatus::Pending => "Pending",
            AssetStatus::Matured => "Matured",
            AssetStatus::Sold => "Sold",
        }
    }
}

/// Return figures derived from the current holdings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssetPerformance {
    pub total_return: f64,
    pub annualized_return: f64,
    pub unrealized_gains: f64,
}

/// Valuation, allocation and performance rollup for all holdings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub allocation: BTreeMap<AssetType, f64>,
    pub performance: AssetPerformance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_new_assigns_distinct_ids() {
        let new = NewAsset {
            name: "Treasury Bonds 2025".into(),
            asset_type: AssetType::Bonds,
            status: AssetStatus::Active,
            purchase_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            purchase_price: 100_000.0,
            current_value: 103_500.0,
            currency: Currency::Usd,
            maturity_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            interest_rate: Some(4.2),
            location: None,
            description: None,
            tags: vec!["government".into()],
            last_valuation_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let a = Asset::from_new(new.clone());
        let b = Asset::from_new(new);
        assert_ne!(a.id, b.id);
        assert_eq!(a.unrealized_gain(), 3_500.0);
    }

    #[test]
    fn real_estate_label_has_space() {
        assert_eq!(AssetType::RealEstate.label(), "Real Estate");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};

/// Categories a risk assessment can fall under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskCategory {
    Credit,
    Market,
    Liquidity,
    Operational,
    InterestRate,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Credit,
        RiskCategory::Market,
        RiskCategory::Liquidity,
        RiskCategory::Operational,
        RiskCategory::InterestRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Credit => "Credit Risk",
            RiskCategory::Market => "Market Risk",
            RiskCategory::Liquidity => "Liquidity Risk",
            RiskCategory::Operational => "Operational Risk",
            RiskCategory::InterestRate => "Interest Rate Risk",
        }
    }
}

/// Severity band derived from a numeric score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bands a 0-100 score: 80 and above is low, 60 medium, 40 high, below
    /// that critical.
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Low
        } else if score >= 60.0 {
            RiskLevel::Medium
        } else if score >= 40.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

/// Scored evaluation of one account under one risk category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category: RiskCategory,
    pub level: RiskLevel,
    pub score: f64,
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default)]
    pub mitigation_strategies: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

impl Identifiable for RiskAssessment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for RiskAssessment {
    fn display_label(&self) -> String {
        format!("{}: {:.0} ({})", self.category.label(), self.score, self.level.label())
    }
}

/// Portfolio-level averages per category plus the weighted overall score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskMetrics {
    pub credit: f64,
    pub market: f64,
    pub liquidity: f64,
    pub operational: f64,
    pub interest_rate: f64,
    pub overall: f64,
}

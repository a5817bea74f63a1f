//! Pure risk-scoring rules. Functions here never touch a store; recording
//! the resulting assessments is an explicit store operation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::account::{Account, AccountStatus, AccountType};
use crate::domain::risk::{RiskAssessment, RiskCategory, RiskLevel, RiskMetrics};

/// Assessments fall due for review this many days after creation.
pub const REVIEW_INTERVAL_DAYS: i64 = 90;

const WEIGHT_CREDIT: f64 = 0.30;
const WEIGHT_MARKET: f64 = 0.20;
const WEIGHT_LIQUIDITY: f64 = 0.20;
const WEIGHT_OPERATIONAL: f64 = 0.10;
const WEIGHT_INTEREST_RATE: f64 = 0.20;

/// Credit risk: penalizes borrowing products and negative balances.
pub fn credit_score(account: &Account) -> (f64, Vec<String>) {
    let mut score = 100.0;
    let mut factors = Vec::new();
    match account.account_type {
        AccountType::Loan => {
            score -= 20.0;
            factors.push("Loan account type".to_string());
        }
        AccountType::Mortgage => {
            score -= 15.0;
            factors.push("Mortgage account type".to_string());
        }
        AccountType::CreditLine => {
            score -= 10.0;
            factors.push("Open credit line".to_string());
        }
        _ => {}
    }
    if account.balance < 0.0 {
        score -= 30.0;
        factors.push("Negative balance".to_string());
    }
    if account.balance < -500_000.0 {
        score -= 20.0;
        factors.push("Outstanding amount above 500,000".to_string());
    }
    (clamp(score), factors)
}

/// Market risk: penalizes holdings exposed to market prices and positions
/// held outside the reporting currency.
pub fn market_score(account: &Account, base_currency: Currency) -> (f64, Vec<String>) {
    let mut score = 100.0;
    let mut factors = Vec::new();
    match account.account_type {
        AccountType::Investment => {
            score -= 35.0;
            factors.push("Direct market exposure".to_string());
        }
        AccountType::Certificate => {
            score -= 10.0;
            factors.push("Rate-locked instrument".to_string());
        }
        _ => {}
    }
    if account.currency != base_currency {
        score -= 15.0;
        factors.push(format!("Held in {}", account.currency.code()));
    }
    (clamp(score), factors)
}

/// Liquidity risk: long-dated products score worse, transactional products
/// better; a thin available balance is penalized.
pub fn liquidity_score(account: &Account) -> (f64, Vec<String>) {
    let mut score = 100.0;
    let mut factors = Vec::new();
    if account.account_type == AccountType::Investment {
        score -= 20.0;
        factors.push("Funds committed to investments".to_string());
    }
    if account.account_type == AccountType::Mortgage {
        score -= 25.0;
        factors.push("Mortgage account type".to_string());
    }
    if matches!(
        account.account_type,
        AccountType::Checking | AccountType::Savings
    ) {
        score += 10.0;
    }
    if let Some(available) = account.available_balance {
        if available < account.balance * 0.1 {
            score -= 30.0;
            factors.push("Available balance under 10% of balance".to_string());
        }
    }
    (clamp(score), factors)
}

/// Operational risk: penalizes accounts that are not in normal standing and
/// unusually large positions.
pub fn operational_score(account: &Account) -> (f64, Vec<String>) {
    let mut score = 100.0;
    let mut factors = Vec::new();
    match account.status {
        AccountStatus::Frozen => {
            score -= 25.0;
            factors.push("Account frozen".to_string());
        }
        AccountStatus::Pending => {
            score -= 15.0;
            factors.push("Account pending activation".to_string());
        }
        AccountStatus::Inactive => {
            score -= 10.0;
            factors.push("Account inactive".to_string());
        }
        _ => {}
    }
    if account.balance.abs() > 1_000_000.0 {
        score -= 10.0;
        factors.push("Large position size".to_string());
    }
    (clamp(score), factors)
}

/// Interest-rate risk: penalizes rate-sensitive products, elevated rates and
/// distant maturities.
pub fn interest_rate_score(account: &Account, today: NaiveDate) -> (f64, Vec<String>) {
    let mut score = 100.0;
    let mut factors = Vec::new();
    if matches!(
        account.account_type,
        AccountType::Mortgage | AccountType::Loan
    ) {
        score -= 25.0;
        factors.push("Fixed-rate lending product".to_string());
    }
    if let Some(rate) = account.interest_rate {
        if rate > 5.0 {
            score -= 20.0;
            factors.push("Interest rate above 5%".to_string());
        } else if rate > 3.0 {
            score -= 10.0;
            factors.push("Interest rate above 3%".to_string());
        }
    }
    if let Some(maturity) = account.maturity_date {
        let days_to_maturity = (maturity - today).num_days();
        if days_to_maturity > 365 * 5 {
            score -= 30.0;
            factors.push("Maturity beyond five years".to_string());
        } else if days_to_maturity > 365 {
            score -= 15.0;
            factors.push("Maturity beyond one year".to_string());
        }
    }
    (clamp(score), factors)
}

/// Scores one account under every category, producing one assessment per
/// category with the banded level and a 90-day review date.
pub fn score_account(
    account: &Account,
    base_currency: Currency,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<RiskAssessment> {
    RiskCategory::ALL
        .iter()
        .map(|category| {
            let (score, factors) = match category {
                RiskCategory::Credit => credit_score(account),
                RiskCategory::Market => market_score(account, base_currency),
                RiskCategory::Liquidity => liquidity_score(account),
                RiskCategory::Operational => operational_score(account),
                RiskCategory::InterestRate => interest_rate_score(account, today),
            };
            RiskAssessment {
                id: Uuid::new_v4(),
                account_id: account.id,
                category: *category,
                level: RiskLevel::for_score(score),
                score,
                factors,
                mitigation_strategies: Vec::new(),
                last_updated: now,
                next_review: now + Duration::days(REVIEW_INTERVAL_DAYS),
            }
        })
        .collect()
}

/// Averages every category across the portfolio and combines them into the
/// weighted overall score. An empty portfolio yields all zeroes, never NaN.
pub fn score_portfolio(
    accounts: &[Account],
    base_currency: Currency,
    today: NaiveDate,
) -> RiskMetrics {
    if accounts.is_empty() {
        return RiskMetrics::default();
    }
    let mut metrics = RiskMetrics::default();
    for account in accounts {
        metrics.credit += credit_score(account).0;
        metrics.market += market_score(account, base_currency).0;
        metrics.liquidity += liquidity_score(account).0;
        metrics.operational += operational_score(account).0;
        metrics.interest_rate += interest_rate_score(account, today).0;
    }
    let count = accounts.len() as f64;
    metrics.credit /= count;
    metrics.market /= count;
    metrics.liquidity /= count;
    metrics.operational /= count;
    metrics.interest_rate /= count;
    metrics.overall = metrics.credit * WEIGHT_CREDIT
        + metrics.market * WEIGHT_MARKET
        + metrics.liquidity * WEIGHT_LIQUIDITY
        + metrics.operational * WEIGHT_OPERATIONAL
        + metrics.interest_rate * WEIGHT_INTEREST_RATE;
    metrics
}

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

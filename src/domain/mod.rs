pub mod account;
pub mod asset;
pub mod common;
pub mod risk;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountStatus, AccountType, NewAccount};
pub use asset::{Asset, AssetPerformance, AssetStatus, AssetType, NewAsset, PortfolioMetrics};
pub use common::{Displayable, Identifiable};
pub use risk::{RiskAssessment, RiskCategory, RiskLevel, RiskMetrics};
pub use transaction::{Transaction, TransactionDraft, TransactionStatus, TransactionType};
pub use user::{Session, SessionUser, UserRecord};

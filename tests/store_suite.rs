use chrono::{NaiveDate, Utc};
use prism_core::core::StateManager;
use prism_core::currency::Currency;
use prism_core::domain::transaction::{TransactionDraft, TransactionType};
use prism_core::domain::{
    AccountStatus, AccountType, AssetStatus, AssetType, NewAccount, NewAsset,
};
use prism_core::errors::TransactionError;
use tempfile::{tempdir, TempDir};

fn open() -> (StateManager, TempDir) {
    let dir = tempdir().expect("temp dir");
    let state = StateManager::with_root(dir.path().to_path_buf()).expect("state");
    (state, dir)
}

fn zero_latency(state: &mut StateManager) {
    let mut config = state.config().clone();
    config.simulated_latency_ms = 0;
    state.update_config(config).expect("config");
}

#[test]
fn dashboard_walkthrough_covers_the_main_flows() {
    let (mut state, _dir) = open();

    // A fresh environment carries the five sample accounts.
    assert_eq!(state.accounts.accounts().len(), 5);
    let checking = state.accounts.accounts()[0].id;
    let savings = state.accounts.accounts()[1].id;

    let payroll = state
        .accounts
        .add(NewAccount {
            name: "Payroll Clearing".into(),
            account_type: AccountType::Checking,
            status: AccountStatus::Active,
            currency: Currency::Usd,
            balance: 0.0,
            available_balance: Some(0.0),
            interest_rate: None,
            open_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            maturity_date: None,
            last_activity_date: None,
            notes: Some("Weekly payroll staging".into()),
        })
        .expect("add account");

    state
        .create_transaction(TransactionDraft::deposit(
            payroll.id,
            80_000.0,
            Currency::Usd,
            "Payroll funding",
        ))
        .expect("deposit");
    state
        .create_transaction(TransactionDraft::withdrawal(
            payroll.id,
            72_500.0,
            Currency::Usd,
            "Payroll run",
        ))
        .expect("withdrawal");
    let sweep = state
        .create_transaction(TransactionDraft::transfer(
            checking,
            savings,
            5_000.0,
            Currency::Usd,
            "End-of-day sweep",
        ))
        .expect("transfer");

    assert_eq!(
        state.accounts.account(payroll.id).map(|a| a.balance),
        Some(7_500.0)
    );
    assert_eq!(
        state.accounts.account(checking).map(|a| a.balance),
        Some(10_750.50)
    );
    assert_eq!(
        state.accounts.account(savings).map(|a| a.balance),
        Some(255_000.00)
    );

    let history = state.transactions.transactions_for_account(payroll.id);
    assert_eq!(history.len(), 2);
    assert!(history
        .iter()
        .all(|txn| txn.from_account == Some(payroll.id) || txn.to_account == Some(payroll.id)));

    let by_type = state
        .transactions
        .transactions_by_type(TransactionType::Transfer);
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].reference, sweep.reference);

    assert_eq!(state.transactions.search(&sweep.reference).len(), 1);
    assert_eq!(state.accounts.search("payroll").len(), 1);

    let csv = state.export_transactions_csv();
    assert_eq!(csv.lines().count(), 4); // header plus three postings
    assert!(csv.contains(&sweep.reference));
}

#[test]
fn rejected_transactions_leave_no_trace() {
    let (mut state, _dir) = open();
    let checking = state.accounts.accounts()[0].id;
    let before = state.accounts.account(checking).map(|a| a.balance);

    let err = state
        .create_transaction(TransactionDraft::withdrawal(
            checking,
            20_000.0,
            Currency::Usd,
            "Overdraft attempt",
        ))
        .unwrap_err();
    assert!(matches!(err, TransactionError::InsufficientBalance));

    assert_eq!(state.accounts.account(checking).map(|a| a.balance), before);
    assert!(state.transactions.transactions().is_empty());
    assert_eq!(state.export_transactions_csv().lines().count(), 1);
}

#[test]
fn portfolio_risk_of_the_seeded_book() {
    let (state, _dir) = open();
    let metrics = state.portfolio_risk();

    // The date-free categories are exact for the fixture accounts: the
    // commercial loan pulls credit down, the treasury position and EUR
    // account dent market, the treasury position dents liquidity.
    assert_eq!(metrics.credit, 86.0);
    assert_eq!(metrics.market, 90.0);
    assert_eq!(metrics.liquidity, 96.0);
    assert_eq!(metrics.operational, 100.0);

    assert!(metrics.interest_rate > 0.0 && metrics.interest_rate <= 100.0);
    assert!(metrics.overall > 70.0 && metrics.overall < 95.0);
}

#[test]
fn refreshing_risk_stores_assessments_per_account() {
    let (mut state, _dir) = open();
    let loan = state.accounts.accounts()[2].id;

    let fresh = state.refresh_account_risk(loan).expect("refresh");
    assert_eq!(fresh.len(), 5);
    assert!(fresh.iter().all(|a| a.account_id == loan));
    assert_eq!(state.risk.assessments().len(), 5);

    // Refreshing again replaces rather than accumulates.
    state.refresh_account_risk(loan).expect("refresh again");
    assert_eq!(state.risk.assessments().len(), 5);

    state.refresh_portfolio_risk().expect("portfolio");
    assert_eq!(state.risk.assessments().len(), 25); // five categories per account
}

#[test]
fn auth_flow_survives_reopen() {
    let dir = tempdir().expect("temp dir");
    let root = dir.path().to_path_buf();

    {
        let mut state = StateManager::with_root(root.clone()).expect("state");
        zero_latency(&mut state);
        state
            .auth
            .signup("Ana Flores", "ana@prism.example", "orchid-42")
            .expect("signup");
        assert!(state.auth.is_authenticated());
    }

    let mut state = StateManager::with_root(root.clone()).expect("reopen");
    assert!(state.auth.is_authenticated());
    assert_eq!(
        state.auth.current_user().map(|u| u.full_name.as_str()),
        Some("Ana Flores")
    );

    state.auth.logout().expect("logout");
    drop(state);

    let state = StateManager::with_root(root).expect("reopen after logout");
    assert!(!state.auth.is_authenticated());
}

#[test]
fn asset_lifecycle_and_portfolio_metrics() {
    let (mut state, _dir) = open();

    let bond = state
        .assets
        .add(NewAsset {
            name: "Treasury Bond Ladder".into(),
            asset_type: AssetType::Bonds,
            status: AssetStatus::Active,
            currency: Currency::Usd,
            purchase_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            purchase_price: 600_000.0,
            current_value: 630_000.0,
            maturity_date: None,
            interest_rate: Some(3.2),
            location: None,
            description: None,
            tags: vec!["ladder".into()],
            last_valuation_date: Utc::now(),
        })
        .expect("add bond");
    state
        .assets
        .add(NewAsset {
            name: "Operating Cash".into(),
            asset_type: AssetType::Cash,
            status: AssetStatus::Active,
            currency: Currency::Usd,
            purchase_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            purchase_price: 420_000.0,
            current_value: 420_000.0,
            maturity_date: None,
            interest_rate: None,
            location: None,
            description: None,
            tags: Vec::new(),
            last_valuation_date: Utc::now(),
        })
        .expect("add cash");

    assert_eq!(state.assets.total_value(), 1_050_000.0);
    let allocation = state.assets.allocation();
    assert_eq!(allocation.get(&AssetType::Bonds), Some(&60.0));
    assert_eq!(allocation.get(&AssetType::Cash), Some(&40.0));

    state
        .assets
        .update_value(bond.id, 615_000.0)
        .expect("mark to market");
    let metrics = state.assets.portfolio_metrics();
    assert_eq!(metrics.total_value, 1_035_000.0);
    assert_eq!(metrics.performance.unrealized_gains, 15_000.0);

    state.assets.remove(bond.id).expect("remove");
    assert_eq!(state.assets.assets().len(), 1);
}

use colored::Colorize;

use prism_core::core::StateManager;
use prism_core::currency::Currency;
use prism_core::domain::risk::RiskLevel;
use prism_core::domain::transaction::TransactionDraft;
use prism_core::init;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("{} {err}", "Error:".red().bold());
        std::process::exit(1);
    }
}

/// Non-interactive walkthrough: list the book, post a transfer, refresh the
/// risk picture, and export the transaction history as CSV.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut state = StateManager::new()?;

    println!("{}", "Accounts".bold());
    for account in state.accounts.accounts() {
        println!(
            "  {}  {:<36} {:>14.2} {}  {}",
            account.account_number.cyan(),
            account.name,
            account.balance,
            account.currency.code(),
            account.status.label().dimmed(),
        );
    }

    let mut funded = state
        .accounts
        .accounts()
        .iter()
        .filter(|account| account.currency == Currency::Usd && account.balance > 0.0);
    let pair = funded
        .next()
        .map(|from| from.id)
        .zip(funded.next().map(|to| to.id));

    println!();
    match pair {
        Some((from, to)) => {
            let draft =
                TransactionDraft::transfer(from, to, 2_500.00, Currency::Usd, "Liquidity sweep");
            let txn = state.create_transaction(draft)?;
            println!(
                "{} {} {} {:.2} {}",
                "Posted".green().bold(),
                txn.reference,
                txn.transaction_type.label(),
                txn.amount,
                txn.currency.code(),
            );
        }
        None => println!("{}", "No funded USD account pair; skipping transfer.".yellow()),
    }

    state.refresh_portfolio_risk()?;
    let metrics = state.portfolio_risk();

    println!();
    println!("{}", "Risk summary".bold());
    print_metric("Credit", metrics.credit);
    print_metric("Market", metrics.market);
    print_metric("Liquidity", metrics.liquidity);
    print_metric("Operational", metrics.operational);
    print_metric("Interest rate", metrics.interest_rate);
    print_metric("Overall", metrics.overall);

    println!();
    println!("{}", "Transaction export".bold());
    print!("{}", state.export_transactions_csv());

    Ok(())
}

fn print_metric(name: &str, score: f64) {
    let level = RiskLevel::for_score(score);
    let label = match level {
        RiskLevel::Low => level.label().green(),
        RiskLevel::Medium => level.label().yellow(),
        RiskLevel::High | RiskLevel::Critical => level.label().red(),
    };
    println!("  {name:<14} {score:>5.1}  {label}");
}

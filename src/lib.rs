#![doc(test(attr(deny(warnings))))]

//! Prism Core is the domain-state layer of the Prism ALM dashboard: accounts,
//! transactions, risk scoring, and asset portfolio tracking over a JSON
//! persistence backend.

pub mod auth;
pub mod config;
pub mod core;
pub mod currency;
pub mod demo;
pub mod domain;
pub mod errors;
pub mod export;
pub mod scoring;
pub mod storage;
pub mod stores;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Prism Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}

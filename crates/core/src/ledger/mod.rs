//! FIFO ledger module - buy/sell booking against the lot store.

mod ledger_errors;
mod ledger_model;
mod ledger_service;

#[cfg(test)]
mod ledger_service_tests;

pub use ledger_errors::LedgerError;
pub use ledger_model::{BuyInput, SellInput};
pub use ledger_service::LedgerService;
pub use ledger_service::LedgerServiceTrait;

pub(crate) use ledger_service::round_money;

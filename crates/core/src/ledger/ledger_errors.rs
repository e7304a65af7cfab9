use thiserror::Error;

/// Errors raised by the FIFO ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A sale asked for more shares than the key currently holds.
    /// Nothing is mutated when this is raised.
    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientLots { requested: i64, available: i64 },

    /// An operation that needs existing holdings found none.
    #[error("No open lots found for ticker {ticker} in account {account_id}")]
    NoLotsFound { account_id: String, ticker: String },

    /// A concurrent writer consumed the same shares first. The whole
    /// operation was rolled back and is safe to retry.
    #[error("Concurrent modification detected: {0}")]
    ConcurrencyConflict(String),
}

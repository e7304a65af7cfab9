use super::lots_model::*;
use crate::Result;
use async_trait::async_trait;

/// Trait defining the contract for lot store operations.
///
/// This is the persistence port injected into the ledger and the
/// adjustment engine; implementations own the transactional guarantees.
#[async_trait]
pub trait LotRepositoryTrait: Send + Sync {
    fn get_lot(&self, lot_id: &str) -> Result<PurchaseLot>;

    /// Open lots (remaining > 0) for one (owner, account, ticker) key,
    /// ordered by purchase date ascending with ties broken by lot id.
    ///
    /// The ordering is the FIFO contract; callers rely on it being
    /// deterministic.
    fn get_open_lots(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
    ) -> Result<Vec<PurchaseLot>>;

    /// All lots for an owner, optionally narrowed to one account,
    /// ordered by purchase date ascending with ties broken by lot id.
    fn get_lots(&self, owner_id: &str, account_id: Option<&str>) -> Result<Vec<PurchaseLot>>;

    /// All sale records for an owner, optionally narrowed to one account,
    /// ordered by sell date ascending with ties broken by record id.
    fn get_sales(&self, owner_id: &str, account_id: Option<&str>) -> Result<Vec<SaleRecord>>;

    async fn create_lot(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot>;

    /// Applies every decrement and inserts the sale record as one
    /// all-or-nothing unit.
    ///
    /// Each decrement carries the remaining quantity the caller observed;
    /// implementations must fail the whole unit with
    /// `LedgerError::ConcurrencyConflict` if any stored value has moved,
    /// leaving no lot changed.
    async fn record_sale(
        &self,
        decrements: Vec<LotDecrement>,
        sale: NewSaleRecord,
    ) -> Result<SaleRecord>;
}

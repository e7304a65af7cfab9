use super::adjustments_model::*;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait defining the contract for adjustment store operations.
#[async_trait]
pub trait AdjustmentRepositoryTrait: Send + Sync {
    fn get_adjustment(&self, adjustment_id: &str) -> Result<CorporateActionAdjustment>;

    /// Active adjustments for one (owner, account, ticker) key, optionally
    /// bounded to event dates on or before `as_of`, ordered by event date
    /// ascending with ties broken by id.
    fn get_active_adjustments(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<CorporateActionAdjustment>>;

    /// All adjustments (active and inactive) for an owner, optionally
    /// narrowed to one account.
    fn list_adjustments(
        &self,
        owner_id: &str,
        account_id: Option<&str>,
    ) -> Result<Vec<CorporateActionAdjustment>>;

    async fn create_adjustment(
        &self,
        new_adjustment: NewCorporateActionAdjustment,
    ) -> Result<CorporateActionAdjustment>;

    /// Creates the adjustment and its companion fee record as one
    /// all-or-nothing unit (cash dividend intake).
    async fn create_adjustment_with_fee(
        &self,
        new_adjustment: NewCorporateActionAdjustment,
        fee: NewFeeRecord,
    ) -> Result<CorporateActionAdjustment>;

    /// Marks an adjustment inactive, excluding it from derived views.
    async fn deactivate_adjustment(&self, adjustment_id: &str)
        -> Result<CorporateActionAdjustment>;

    async fn delete_adjustment(&self, adjustment_id: &str) -> Result<()>;
}

/// Trait defining the contract for adjustment engine operations.
#[async_trait]
pub trait AdjustmentServiceTrait: Send + Sync {
    /// Derived adjusted cost-basis view for one key. Pure read path.
    fn calculate_adjusted_position(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<AdjustedPosition>;

    /// Per-lot adjusted view for one key.
    fn calculate_adjusted_lots(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<AdjustedLot>>;

    async fn process_cash_dividend(
        &self,
        input: CashDividendInput,
    ) -> Result<CorporateActionAdjustment>;

    async fn process_stock_dividend(
        &self,
        input: StockDividendInput,
    ) -> Result<CorporateActionAdjustment>;

    async fn process_stock_split(
        &self,
        input: StockSplitInput,
    ) -> Result<CorporateActionAdjustment>;

    fn list_adjustments(
        &self,
        owner_id: &str,
        account_id: Option<&str>,
    ) -> Result<Vec<CorporateActionAdjustment>>;

    async fn deactivate_adjustment(&self, adjustment_id: &str)
        -> Result<CorporateActionAdjustment>;

    async fn delete_adjustment(&self, adjustment_id: &str) -> Result<()>;
}

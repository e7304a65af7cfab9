use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::adjustments::adjustments_calculator::apply_adjustments;
use crate::adjustments::adjustments_model::*;
use crate::adjustments::adjustments_traits::{AdjustmentRepositoryTrait, AdjustmentServiceTrait};
use crate::constants::FEE_KIND_DIVIDEND_TAX;
use crate::ledger::{round_money, LedgerError};
use crate::lots::{normalize_ticker, LotRepositoryTrait, PurchaseLot};
use crate::Result;

/// Corporate-action adjustment engine.
///
/// The read path (`calculate_*`) recomputes the adjusted view from stored
/// lots and adjustments on every call; nothing is cached and no stored row
/// is mutated. The intake path (`process_*`) creates adjustment rows and,
/// for cash dividends, the companion withheld-tax fee record. Intake is not
/// idempotent: repeated calls create duplicate adjustments, and dedup (for
/// example by `external_ref`) belongs to the caller.
pub struct AdjustmentService {
    lot_repository: Arc<dyn LotRepositoryTrait>,
    adjustment_repository: Arc<dyn AdjustmentRepositoryTrait>,
}

impl AdjustmentService {
    pub fn new(
        lot_repository: Arc<dyn LotRepositoryTrait>,
        adjustment_repository: Arc<dyn AdjustmentRepositoryTrait>,
    ) -> Self {
        Self {
            lot_repository,
            adjustment_repository,
        }
    }

    fn load_open_lots(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
    ) -> Result<Vec<PurchaseLot>> {
        self.lot_repository
            .get_open_lots(owner_id, account_id, ticker)
    }

    /// Open lots are required before an adjustment can be taken in; an
    /// adjustment on an empty key is a reported domain error, not a no-op.
    fn require_open_lots(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
    ) -> Result<Vec<PurchaseLot>> {
        let lots = self.load_open_lots(owner_id, account_id, ticker)?;
        if lots.is_empty() {
            return Err(LedgerError::NoLotsFound {
                account_id: account_id.to_string(),
                ticker: ticker.to_string(),
            }
            .into());
        }
        Ok(lots)
    }
}

#[async_trait]
impl AdjustmentServiceTrait for AdjustmentService {
    fn calculate_adjusted_lots(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<AdjustedLot>> {
        let ticker = normalize_ticker(ticker);
        let lots = self.load_open_lots(owner_id, account_id, &ticker)?;
        let adjustments =
            self.adjustment_repository
                .get_active_adjustments(owner_id, account_id, &ticker, as_of)?;
        Ok(apply_adjustments(&lots, &adjustments))
    }

    /// Sums the adjusted view into per-key totals.
    ///
    /// Degrades to a zero-valued position when the key holds no open lots.
    /// `adjustments_applied` counts the active adjustments considered for
    /// the key in the `as_of` window.
    fn calculate_adjusted_position(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<AdjustedPosition> {
        let ticker = normalize_ticker(ticker);
        let lots = self.load_open_lots(owner_id, account_id, &ticker)?;
        if lots.is_empty() {
            return Ok(AdjustedPosition::empty(account_id, &ticker));
        }
        let adjustments =
            self.adjustment_repository
                .get_active_adjustments(owner_id, account_id, &ticker, as_of)?;
        let adjusted = apply_adjustments(&lots, &adjustments);

        let total_quantity: i64 = adjusted.iter().map(|lot| lot.adjusted_remaining).sum();
        // Cost attributable to the unsold remainder of each lot.
        let total_cost: Decimal = adjusted
            .iter()
            .map(|lot| {
                if lot.adjusted_quantity == 0 {
                    Decimal::ZERO
                } else {
                    lot.adjusted_total_cost * Decimal::from(lot.adjusted_remaining)
                        / Decimal::from(lot.adjusted_quantity)
                }
            })
            .sum();
        let total_cost = round_money(total_cost);
        let average_cost = if total_quantity == 0 {
            Decimal::ZERO
        } else {
            round_money(total_cost / Decimal::from(total_quantity))
        };

        Ok(AdjustedPosition {
            account_id: account_id.to_string(),
            ticker,
            total_quantity,
            total_cost,
            average_cost,
            adjustments_applied: adjustments.iter().filter(|a| a.is_active).count(),
        })
    }

    /// Takes in a cash dividend: one adjustment row plus one DIVIDEND_TAX
    /// fee record for the withheld tax, committed atomically. Lot rows are
    /// never touched; already-realized profit is unaffected.
    async fn process_cash_dividend(
        &self,
        input: CashDividendInput,
    ) -> Result<CorporateActionAdjustment> {
        let ticker = normalize_ticker(&input.ticker);
        let new_adjustment = NewCorporateActionAdjustment {
            id: Some(Uuid::new_v4().to_string()),
            owner_id: input.owner_id.clone(),
            account_id: input.account_id.clone(),
            ticker: ticker.clone(),
            kind: AdjustmentKind::CashDividend,
            event_date: input.event_date,
            dividend_per_share: Some(input.dividend_per_share),
            tax_rate: Some(input.tax_rate),
            ratio: None,
            description: input.description,
            external_ref: input.external_ref,
        };
        new_adjustment.validate()?;

        let lots = self.require_open_lots(&input.owner_id, &input.account_id, &ticker)?;
        let held: i64 = lots.iter().map(|lot| lot.remaining_quantity).sum();
        let gross_dividend = Decimal::from(held) * input.dividend_per_share;
        let withheld_tax = round_money(gross_dividend * input.tax_rate);
        debug!(
            "process_cash_dividend: account={} ticker={} held={} withheld={}",
            input.account_id, ticker, held, withheld_tax
        );

        let fee = NewFeeRecord {
            owner_id: input.owner_id.clone(),
            account_id: input.account_id.clone(),
            kind: FEE_KIND_DIVIDEND_TAX.to_string(),
            amount: withheld_tax,
            record_date: input.event_date,
            description: Some(format!("Withheld dividend tax for {}", ticker)),
        };

        self.adjustment_repository
            .create_adjustment_with_fee(new_adjustment, fee)
            .await
    }

    async fn process_stock_dividend(
        &self,
        input: StockDividendInput,
    ) -> Result<CorporateActionAdjustment> {
        let ticker = normalize_ticker(&input.ticker);
        let new_adjustment = NewCorporateActionAdjustment {
            id: Some(Uuid::new_v4().to_string()),
            owner_id: input.owner_id.clone(),
            account_id: input.account_id.clone(),
            ticker: ticker.clone(),
            kind: AdjustmentKind::StockDividend,
            event_date: input.event_date,
            dividend_per_share: None,
            tax_rate: None,
            ratio: Some(input.ratio),
            description: input.description,
            external_ref: input.external_ref,
        };
        new_adjustment.validate()?;
        self.require_open_lots(&input.owner_id, &input.account_id, &ticker)?;
        debug!(
            "process_stock_dividend: account={} ticker={} ratio={}",
            input.account_id, ticker, input.ratio
        );
        self.adjustment_repository
            .create_adjustment(new_adjustment)
            .await
    }

    async fn process_stock_split(
        &self,
        input: StockSplitInput,
    ) -> Result<CorporateActionAdjustment> {
        let ticker = normalize_ticker(&input.ticker);
        let new_adjustment = NewCorporateActionAdjustment {
            id: Some(Uuid::new_v4().to_string()),
            owner_id: input.owner_id.clone(),
            account_id: input.account_id.clone(),
            ticker: ticker.clone(),
            kind: AdjustmentKind::StockSplit,
            event_date: input.event_date,
            dividend_per_share: None,
            tax_rate: None,
            ratio: Some(input.ratio),
            description: input.description,
            external_ref: input.external_ref,
        };
        new_adjustment.validate()?;
        self.require_open_lots(&input.owner_id, &input.account_id, &ticker)?;
        debug!(
            "process_stock_split: account={} ticker={} ratio={}",
            input.account_id, ticker, input.ratio
        );
        self.adjustment_repository
            .create_adjustment(new_adjustment)
            .await
    }

    fn list_adjustments(
        &self,
        owner_id: &str,
        account_id: Option<&str>,
    ) -> Result<Vec<CorporateActionAdjustment>> {
        self.adjustment_repository
            .list_adjustments(owner_id, account_id)
    }

    async fn deactivate_adjustment(
        &self,
        adjustment_id: &str,
    ) -> Result<CorporateActionAdjustment> {
        debug!("deactivate_adjustment: {}", adjustment_id);
        self.adjustment_repository
            .deactivate_adjustment(adjustment_id)
            .await
    }

    async fn delete_adjustment(&self, adjustment_id: &str) -> Result<()> {
        debug!("delete_adjustment: {}", adjustment_id);
        self.adjustment_repository
            .delete_adjustment(adjustment_id)
            .await
    }
}

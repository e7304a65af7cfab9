use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use num_traits::Zero;
use rust_decimal::Decimal;

use crate::ledger::round_money;
use crate::lots::{LotRepositoryTrait, PurchaseLot, SaleRecord};
use crate::positions::positions_model::PositionSummary;
use crate::Result;

/// Trait defining the contract for position aggregation.
pub trait PositionsServiceTrait: Send + Sync {
    fn aggregate_positions(
        &self,
        owner_id: &str,
        account_id: Option<&str>,
    ) -> Result<Vec<PositionSummary>>;
}

/// Folds the lot store into per-ticker net position summaries.
///
/// Cost is replayed in date order with sales removing cost proportionally
/// (`cost x shares_sold / quantity`), i.e. a weighted-average approximation.
/// This intentionally diverges from the FIFO-exact cost of goods sold the
/// ledger books on [`crate::ledger::LedgerService::record_sell`]; the two
/// figures are separate policies and must not be reconciled against each
/// other. Use this one for display only.
pub struct PositionsService {
    lot_repository: Arc<dyn LotRepositoryTrait>,
}

enum ReplayEvent<'a> {
    Buy(&'a PurchaseLot),
    Sell(&'a SaleRecord),
}

impl ReplayEvent<'_> {
    fn date(&self) -> DateTime<Utc> {
        match self {
            ReplayEvent::Buy(lot) => lot.purchase_date,
            ReplayEvent::Sell(sale) => sale.sell_date,
        }
    }

    /// Same-date ordering: purchases before sales, then by id.
    fn sort_key(&self) -> (DateTime<Utc>, u8, &str) {
        match self {
            ReplayEvent::Buy(lot) => (lot.purchase_date, 0, lot.id.as_str()),
            ReplayEvent::Sell(sale) => (sale.sell_date, 1, sale.id.as_str()),
        }
    }
}

#[derive(Default)]
struct RunningPosition {
    quantity: i64,
    total_cost: Decimal,
    inception_date: Option<DateTime<Utc>>,
}

impl PositionsService {
    pub fn new(lot_repository: Arc<dyn LotRepositoryTrait>) -> Self {
        Self { lot_repository }
    }
}

impl PositionsServiceTrait for PositionsService {
    fn aggregate_positions(
        &self,
        owner_id: &str,
        account_id: Option<&str>,
    ) -> Result<Vec<PositionSummary>> {
        let lots = self.lot_repository.get_lots(owner_id, account_id)?;
        let sales = self.lot_repository.get_sales(owner_id, account_id)?;
        debug!(
            "aggregate_positions: owner={} lots={} sales={}",
            owner_id,
            lots.len(),
            sales.len()
        );

        // One replay stream per (account, ticker) key.
        let mut streams: BTreeMap<(String, String), Vec<ReplayEvent<'_>>> = BTreeMap::new();
        for lot in &lots {
            streams
                .entry((lot.account_id.clone(), lot.ticker.clone()))
                .or_default()
                .push(ReplayEvent::Buy(lot));
        }
        for sale in &sales {
            streams
                .entry((sale.account_id.clone(), sale.ticker.clone()))
                .or_default()
                .push(ReplayEvent::Sell(sale));
        }

        let mut summaries = Vec::new();
        for ((account_id, ticker), mut events) in streams {
            events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

            let mut running = RunningPosition::default();
            for event in &events {
                match event {
                    ReplayEvent::Buy(lot) => {
                        running.quantity += lot.original_quantity;
                        running.total_cost += lot.total_cost;
                        if running.inception_date.is_none() {
                            running.inception_date = Some(event.date());
                        }
                    }
                    ReplayEvent::Sell(sale) => {
                        if running.quantity <= 0 {
                            continue;
                        }
                        let sold = sale.quantity.min(running.quantity);
                        running.total_cost -= running.total_cost * Decimal::from(sold)
                            / Decimal::from(running.quantity);
                        running.quantity -= sold;
                    }
                }
            }

            // Zero-quantity positions are dropped from the summary.
            if running.quantity <= 0 {
                continue;
            }
            let total_cost = round_money(running.total_cost);
            let average_cost = if running.quantity == 0 || total_cost.is_zero() {
                Decimal::zero()
            } else {
                round_money(total_cost / Decimal::from(running.quantity))
            };
            summaries.push(PositionSummary {
                account_id,
                ticker,
                quantity: running.quantity,
                total_cost,
                average_cost,
                inception_date: running.inception_date.unwrap_or_else(Utc::now),
            });
        }

        Ok(summaries)
    }
}

//! Pure adjusted-cost-basis calculator.
//!
//! Derives a read-only view of lots with corporate actions folded in.
//! Nothing here persists or mutates; the live FIFO ledger and any realized
//! profit already booked from it are never affected by this view.

use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::adjustments::adjustments_model::{
    AdjustedLot, AdjustmentKind, CorporateActionAdjustment,
};
use crate::ledger::round_money;
use crate::lots::PurchaseLot;

/// Folds active adjustments into each lot.
///
/// Per lot, the adjustments considered are the active ones with an event
/// date on or after the lot's purchase date, applied in ascending event
/// date order (ties broken by adjustment id) over a running
/// (quantity, remaining, total cost) seeded from the stored lot:
///
/// - CASH_DIVIDEND reduces the running total cost by
///   `remaining x dividend_per_share` (cost-basis-reduction method). The
///   result may go negative.
/// - STOCK_DIVIDEND and STOCK_SPLIT floor-multiply both quantities by the
///   ratio and leave total cost unchanged. Floor, never round: fractional
///   shares must not be manufactured.
pub fn apply_adjustments(
    lots: &[PurchaseLot],
    adjustments: &[CorporateActionAdjustment],
) -> Vec<AdjustedLot> {
    let mut ordered: Vec<&CorporateActionAdjustment> =
        adjustments.iter().filter(|adj| adj.is_active).collect();
    ordered.sort_by(|a, b| a.event_date.cmp(&b.event_date).then(a.id.cmp(&b.id)));

    lots.iter().map(|lot| adjust_lot(lot, &ordered)).collect()
}

fn adjust_lot(lot: &PurchaseLot, ordered: &[&CorporateActionAdjustment]) -> AdjustedLot {
    let mut quantity = lot.original_quantity;
    let mut remaining = lot.remaining_quantity;
    let mut total_cost = lot.total_cost;
    let mut applied = 0usize;

    for adjustment in ordered {
        if adjustment.event_date < lot.purchase_date {
            continue;
        }
        match adjustment.kind {
            AdjustmentKind::CashDividend => {
                let Some(per_share) = adjustment.dividend_per_share else {
                    warn!(
                        "cash dividend {} has no per-share amount; skipping",
                        adjustment.id
                    );
                    continue;
                };
                total_cost -= Decimal::from(remaining) * per_share;
            }
            AdjustmentKind::StockDividend | AdjustmentKind::StockSplit => {
                let Some(ratio) = adjustment.ratio else {
                    warn!("adjustment {} has no ratio; skipping", adjustment.id);
                    continue;
                };
                quantity = floor_scaled(quantity, ratio);
                remaining = floor_scaled(remaining, ratio);
            }
        }
        applied += 1;
    }

    let adjusted_cost_per_share = if quantity == 0 {
        Decimal::ZERO
    } else {
        round_money(total_cost / Decimal::from(quantity))
    };

    AdjustedLot {
        lot_id: lot.id.clone(),
        purchase_date: lot.purchase_date,
        adjusted_quantity: quantity,
        adjusted_remaining: remaining,
        adjusted_total_cost: total_cost,
        adjusted_cost_per_share,
        adjustments_applied: applied,
    }
}

/// `floor(count x ratio)` on whole-share counts.
fn floor_scaled(count: i64, ratio: Decimal) -> i64 {
    let scaled = (Decimal::from(count) * ratio).floor();
    scaled.to_i64().unwrap_or_else(|| {
        warn!("share count {} x {} overflows; keeping {}", count, ratio, count);
        count
    })
}

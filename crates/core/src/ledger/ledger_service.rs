use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::ledger::ledger_errors::LedgerError;
use crate::ledger::ledger_model::{BuyInput, SellInput};
use crate::lots::{
    normalize_ticker, LotConsumption, LotDecrement, LotRepositoryTrait, NewPurchaseLot,
    NewSaleRecord, PurchaseLot, SellOutcome,
};
use crate::Result;

/// Trait defining the contract for ledger operations.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    async fn record_buy(&self, input: BuyInput) -> Result<PurchaseLot>;
    async fn record_sell(&self, input: SellInput) -> Result<SellOutcome>;
}

/// FIFO cost-basis ledger.
///
/// A buy appends one purchase lot; a sell consumes open lots oldest-first
/// and books the realized profit or loss against the lots' original
/// (unadjusted) unit cost. FIFO is the only matching policy.
pub struct LedgerService {
    lot_repository: Arc<dyn LotRepositoryTrait>,
}

impl LedgerService {
    pub fn new(lot_repository: Arc<dyn LotRepositoryTrait>) -> Self {
        Self { lot_repository }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    /// Books a purchase as a new lot.
    ///
    /// The buy fee is capitalized into the lot's total cost, so it flows
    /// into the cost basis of every future sale from this lot.
    async fn record_buy(&self, input: BuyInput) -> Result<PurchaseLot> {
        input.validate()?;
        let ticker = normalize_ticker(&input.ticker);
        debug!(
            "record_buy: account={} ticker={} qty={} price={}",
            input.account_id, ticker, input.quantity, input.price_per_share
        );

        let total_cost = Decimal::from(input.quantity) * input.price_per_share + input.fee;
        let new_lot = NewPurchaseLot {
            id: Some(Uuid::new_v4().to_string()),
            owner_id: input.owner_id,
            account_id: input.account_id,
            ticker,
            purchase_date: input.purchase_date,
            quantity: input.quantity,
            price_per_share: input.price_per_share,
            buy_fee: input.fee,
            total_cost,
        };
        self.lot_repository.create_lot(new_lot).await
    }

    /// Books a sale against open lots, oldest purchase first.
    ///
    /// Fails with [`LedgerError::InsufficientLots`] before touching anything
    /// when the key holds fewer shares than requested. The lot decrements
    /// and the sale record commit as one unit through the repository; a
    /// conflicting concurrent sale rolls the whole operation back.
    async fn record_sell(&self, input: SellInput) -> Result<SellOutcome> {
        input.validate()?;
        let ticker = normalize_ticker(&input.ticker);
        debug!(
            "record_sell: account={} ticker={} qty={} price={}",
            input.account_id, ticker, input.quantity, input.price_per_share
        );

        let lots = self
            .lot_repository
            .get_open_lots(&input.owner_id, &input.account_id, &ticker)?;

        let available: i64 = lots.iter().map(|lot| lot.remaining_quantity).sum();
        if available < input.quantity {
            return Err(LedgerError::InsufficientLots {
                requested: input.quantity,
                available,
            }
            .into());
        }

        let mut remaining_to_sell = input.quantity;
        let mut total_cogs = Decimal::ZERO;
        let mut consumptions: Vec<LotConsumption> = Vec::new();
        let mut decrements: Vec<LotDecrement> = Vec::new();

        for lot in &lots {
            if remaining_to_sell == 0 {
                break;
            }
            let consumed = remaining_to_sell.min(lot.remaining_quantity);
            // Consumed cost always derives from the lot's original unit
            // cost (price plus amortized buy fee), never an adjusted basis.
            let unit_cost = lot.unit_cost();
            let cost = Decimal::from(consumed) * unit_cost;
            total_cogs += cost;
            consumptions.push(LotConsumption {
                lot_id: lot.id.clone(),
                quantity: consumed,
                unit_cost,
                cost,
            });
            decrements.push(LotDecrement {
                lot_id: lot.id.clone(),
                expected_remaining: lot.remaining_quantity,
                new_remaining: lot.remaining_quantity - consumed,
            });
            remaining_to_sell -= consumed;
        }

        let gross_sell_value = input.price_per_share * Decimal::from(input.quantity);
        let selling_tax =
            round_money(gross_sell_value * input.tax_rate_percent / Decimal::ONE_HUNDRED);
        let net_proceeds = round_money(gross_sell_value - input.fee - selling_tax);
        let total_cogs = round_money(total_cogs);
        let profit_or_loss = net_proceeds - total_cogs;

        let outcome = SellOutcome {
            gross_sell_value,
            selling_tax,
            sell_fee: input.fee,
            net_proceeds,
            total_cogs,
            profit_or_loss,
            consumptions: consumptions.clone(),
        };

        let sale = NewSaleRecord {
            owner_id: input.owner_id,
            account_id: input.account_id,
            ticker,
            sell_date: input.sell_date,
            quantity: input.quantity,
            price_per_share: input.price_per_share,
            gross_sell_value,
            selling_tax,
            sell_fee: input.fee,
            net_proceeds,
            total_cogs,
            profit_or_loss,
            consumptions,
        };

        let record = self.lot_repository.record_sale(decrements, sale).await?;
        debug!(
            "record_sell booked: sale={} cogs={} pnl={}",
            record.id, total_cogs, profit_or_loss
        );
        Ok(outcome)
    }
}

/// Rounds a monetary amount at the outcome boundary.
///
/// Half-even, applied only where results leave the ledger; intermediate
/// FIFO arithmetic stays at full precision.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PRECISION, RoundingStrategy::MidpointNearestEven)
}

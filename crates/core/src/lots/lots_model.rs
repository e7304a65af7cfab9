//! Purchase lot and sale record domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalizes a ticker symbol for use as part of a position key.
///
/// Lots and corporate-action adjustments are associated by
/// (owner, account, ticker), so both sides must normalize the same way.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// A single purchase event and its unsold remainder.
///
/// Everything except `remaining_quantity` (and `updated_at`) is write-once:
/// `total_cost` is fixed at creation as `quantity x price + fee`, and
/// `remaining_quantity` only ever decreases through FIFO consumption on a
/// sale. Lots are never deleted, so fully consumed lots remain available
/// for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLot {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub purchase_date: DateTime<Utc>,
    pub original_quantity: i64,
    pub price_per_share: Decimal,
    pub buy_fee: Decimal,
    /// quantity x price + buy fee, fixed at creation.
    pub total_cost: Decimal,
    pub remaining_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseLot {
    /// Original cost per share: purchase price plus the amortized buy fee.
    ///
    /// This is the basis used for FIFO cost-of-goods-sold, never an
    /// adjusted basis.
    pub fn unit_cost(&self) -> Decimal {
        if self.original_quantity == 0 {
            return Decimal::ZERO;
        }
        self.total_cost / Decimal::from(self.original_quantity)
    }

    /// True while the lot still holds unsold shares.
    pub fn is_open(&self) -> bool {
        self.remaining_quantity > 0
    }
}

/// Input for creating a purchase lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchaseLot {
    /// Optional caller-supplied id; a UUID is generated when absent.
    pub id: Option<String>,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub purchase_date: DateTime<Utc>,
    pub quantity: i64,
    pub price_per_share: Decimal,
    pub buy_fee: Decimal,
    pub total_cost: Decimal,
}

/// One lot's share of a sale, in FIFO order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotConsumption {
    pub lot_id: String,
    pub quantity: i64,
    /// The lot's original unit cost at consumption time.
    pub unit_cost: Decimal,
    /// quantity x unit_cost.
    pub cost: Decimal,
}

/// The computed outcome of a sale.
///
/// Ephemeral: the ledger persists it onto a [`SaleRecord`] in the same
/// transaction that decrements the consumed lots, and hands it back to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOutcome {
    pub gross_sell_value: Decimal,
    pub selling_tax: Decimal,
    pub sell_fee: Decimal,
    /// gross - fee - tax.
    pub net_proceeds: Decimal,
    pub total_cogs: Decimal,
    /// net_proceeds - total_cogs.
    pub profit_or_loss: Decimal,
    pub consumptions: Vec<LotConsumption>,
}

/// A remaining-quantity decrement to apply to one lot.
///
/// `expected_remaining` is the remaining quantity observed when the sale was
/// computed; the storage layer must refuse the whole sale if the stored value
/// no longer matches (another sale consumed the same shares in between).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDecrement {
    pub lot_id: String,
    pub expected_remaining: i64,
    pub new_remaining: i64,
}

/// The transaction record a [`SellOutcome`] is stored onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub sell_date: DateTime<Utc>,
    pub quantity: i64,
    pub price_per_share: Decimal,
    pub gross_sell_value: Decimal,
    pub selling_tax: Decimal,
    pub sell_fee: Decimal,
    pub net_proceeds: Decimal,
    pub total_cogs: Decimal,
    pub profit_or_loss: Decimal,
    pub consumptions: Vec<LotConsumption>,
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a sale record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleRecord {
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub sell_date: DateTime<Utc>,
    pub quantity: i64,
    pub price_per_share: Decimal,
    pub gross_sell_value: Decimal,
    pub selling_tax: Decimal,
    pub sell_fee: Decimal,
    pub net_proceeds: Decimal,
    pub total_cogs: Decimal,
    pub profit_or_loss: Decimal,
    pub consumptions: Vec<LotConsumption>,
}

//! Database models for purchase lots and sale records.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lotfolio_core::lots::{NewPurchaseLot, NewSaleRecord, PurchaseLot, SaleRecord};

use crate::utils::{format_datetime, parse_datetime_string_tolerant, parse_decimal_string_tolerant};

/// Database model for purchase lots.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, Serialize, Deserialize, Debug,
    Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::purchase_lots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PurchaseLotDB {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub purchase_date: String,
    pub original_quantity: i64,
    pub price_per_share: String,
    pub buy_fee: String,
    pub total_cost: String,
    pub remaining_quantity: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PurchaseLotDB> for PurchaseLot {
    fn from(db: PurchaseLotDB) -> Self {
        PurchaseLot {
            purchase_date: parse_datetime_string_tolerant(&db.purchase_date, "purchase_date"),
            price_per_share: parse_decimal_string_tolerant(&db.price_per_share, "price_per_share"),
            buy_fee: parse_decimal_string_tolerant(&db.buy_fee, "buy_fee"),
            total_cost: parse_decimal_string_tolerant(&db.total_cost, "total_cost"),
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
            updated_at: parse_datetime_string_tolerant(&db.updated_at, "updated_at"),
            id: db.id,
            owner_id: db.owner_id,
            account_id: db.account_id,
            ticker: db.ticker,
            original_quantity: db.original_quantity,
            remaining_quantity: db.remaining_quantity,
        }
    }
}

impl From<NewPurchaseLot> for PurchaseLotDB {
    fn from(new_lot: NewPurchaseLot) -> Self {
        let now = format_datetime(Utc::now());
        PurchaseLotDB {
            id: new_lot.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            owner_id: new_lot.owner_id,
            account_id: new_lot.account_id,
            ticker: new_lot.ticker,
            purchase_date: format_datetime(new_lot.purchase_date),
            original_quantity: new_lot.quantity,
            price_per_share: new_lot.price_per_share.to_string(),
            buy_fee: new_lot.buy_fee.to_string(),
            total_cost: new_lot.total_cost.to_string(),
            remaining_quantity: new_lot.quantity,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Database model for sale records. The per-lot consumption breakdown is
/// stored as a JSON column.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone,
    PartialEq,
)]
#[diesel(table_name = crate::schema::sale_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SaleRecordDB {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub sell_date: String,
    pub quantity: i64,
    pub price_per_share: String,
    pub gross_sell_value: String,
    pub selling_tax: String,
    pub sell_fee: String,
    pub net_proceeds: String,
    pub total_cogs: String,
    pub profit_or_loss: String,
    pub consumptions: String,
    pub created_at: String,
}

impl From<SaleRecordDB> for SaleRecord {
    fn from(db: SaleRecordDB) -> Self {
        let consumptions = serde_json::from_str(&db.consumptions).unwrap_or_else(|err| {
            log::error!(
                "Failed to parse consumption breakdown for sale {}: {}",
                db.id,
                err
            );
            Vec::new()
        });
        SaleRecord {
            sell_date: parse_datetime_string_tolerant(&db.sell_date, "sell_date"),
            price_per_share: parse_decimal_string_tolerant(&db.price_per_share, "price_per_share"),
            gross_sell_value: parse_decimal_string_tolerant(
                &db.gross_sell_value,
                "gross_sell_value",
            ),
            selling_tax: parse_decimal_string_tolerant(&db.selling_tax, "selling_tax"),
            sell_fee: parse_decimal_string_tolerant(&db.sell_fee, "sell_fee"),
            net_proceeds: parse_decimal_string_tolerant(&db.net_proceeds, "net_proceeds"),
            total_cogs: parse_decimal_string_tolerant(&db.total_cogs, "total_cogs"),
            profit_or_loss: parse_decimal_string_tolerant(&db.profit_or_loss, "profit_or_loss"),
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
            consumptions,
            id: db.id,
            owner_id: db.owner_id,
            account_id: db.account_id,
            ticker: db.ticker,
            quantity: db.quantity,
        }
    }
}

impl SaleRecordDB {
    /// Builds the insertable row, serializing the consumption breakdown.
    pub fn from_new(sale: NewSaleRecord) -> Result<Self, serde_json::Error> {
        let consumptions = serde_json::to_string(&sale.consumptions)?;
        Ok(SaleRecordDB {
            id: Uuid::new_v4().to_string(),
            owner_id: sale.owner_id,
            account_id: sale.account_id,
            ticker: sale.ticker,
            sell_date: format_datetime(sale.sell_date),
            quantity: sale.quantity,
            price_per_share: sale.price_per_share.to_string(),
            gross_sell_value: sale.gross_sell_value.to_string(),
            selling_tax: sale.selling_tax.to_string(),
            sell_fee: sale.sell_fee.to_string(),
            net_proceeds: sale.net_proceeds.to_string(),
            total_cogs: sale.total_cogs.to_string(),
            profit_or_loss: sale.profit_or_loss.to_string(),
            consumptions,
            created_at: format_datetime(Utc::now()),
        })
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use lotfolio_core::lots::{
    LotDecrement, LotRepositoryTrait, NewPurchaseLot, NewSaleRecord, PurchaseLot, SaleRecord,
};
use lotfolio_core::{Error, Result};

use super::model::{PurchaseLotDB, SaleRecordDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{purchase_lots, sale_records};
use crate::utils::format_datetime;

/// Repository for purchase lots and sale records.
pub struct LotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LotRepositoryTrait for LotRepository {
    fn get_lot(&self, lot_id: &str) -> Result<PurchaseLot> {
        let mut conn = get_connection(&self.pool)?;
        let lot_db = purchase_lots::table
            .select(PurchaseLotDB::as_select())
            .find(lot_id)
            .first::<PurchaseLotDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(PurchaseLot::from(lot_db))
    }

    fn get_open_lots(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
    ) -> Result<Vec<PurchaseLot>> {
        let mut conn = get_connection(&self.pool)?;
        // purchase_date is fixed-width RFC 3339 TEXT, so the ascending
        // string order is chronological; the id column breaks date ties
        // deterministically.
        let lots_db = purchase_lots::table
            .filter(purchase_lots::owner_id.eq(owner_id))
            .filter(purchase_lots::account_id.eq(account_id))
            .filter(purchase_lots::ticker.eq(ticker))
            .filter(purchase_lots::remaining_quantity.gt(0))
            .order((purchase_lots::purchase_date.asc(), purchase_lots::id.asc()))
            .select(PurchaseLotDB::as_select())
            .load::<PurchaseLotDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(lots_db.into_iter().map(PurchaseLot::from).collect())
    }

    fn get_lots(&self, owner_id: &str, account_id: Option<&str>) -> Result<Vec<PurchaseLot>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = purchase_lots::table
            .filter(purchase_lots::owner_id.eq(owner_id))
            .select(PurchaseLotDB::as_select())
            .into_boxed();
        if let Some(account_id) = account_id {
            query = query.filter(purchase_lots::account_id.eq(account_id));
        }
        let lots_db = query
            .order((purchase_lots::purchase_date.asc(), purchase_lots::id.asc()))
            .load::<PurchaseLotDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(lots_db.into_iter().map(PurchaseLot::from).collect())
    }

    fn get_sales(&self, owner_id: &str, account_id: Option<&str>) -> Result<Vec<SaleRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = sale_records::table
            .filter(sale_records::owner_id.eq(owner_id))
            .select(SaleRecordDB::as_select())
            .into_boxed();
        if let Some(account_id) = account_id {
            query = query.filter(sale_records::account_id.eq(account_id));
        }
        let sales_db = query
            .order((sale_records::sell_date.asc(), sale_records::id.asc()))
            .load::<SaleRecordDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(sales_db.into_iter().map(SaleRecord::from).collect())
    }

    async fn create_lot(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot> {
        let lot_db = PurchaseLotDB::from(new_lot);
        let inserted = self
            .writer
            .exec(move |conn| {
                diesel::insert_into(purchase_lots::table)
                    .values(&lot_db)
                    .execute(conn)?;
                Ok(lot_db)
            })
            .await?;
        Ok(PurchaseLot::from(inserted))
    }

    async fn record_sale(
        &self,
        decrements: Vec<LotDecrement>,
        sale: NewSaleRecord,
    ) -> Result<SaleRecord> {
        let sale_db = SaleRecordDB::from_new(sale)
            .map_err(|e| Error::from(StorageError::SerializationError(e.to_string())))?;

        let inserted = self
            .writer
            .exec(move |conn| {
                let now = format_datetime(Utc::now());
                for decrement in &decrements {
                    // Guarded decrement: zero rows updated means another
                    // sale moved the remaining quantity after our snapshot.
                    // Erroring here rolls back every decrement in the unit.
                    let updated = diesel::update(
                        purchase_lots::table
                            .filter(purchase_lots::id.eq(&decrement.lot_id))
                            .filter(
                                purchase_lots::remaining_quantity
                                    .eq(decrement.expected_remaining),
                            ),
                    )
                    .set((
                        purchase_lots::remaining_quantity.eq(decrement.new_remaining),
                        purchase_lots::updated_at.eq(&now),
                    ))
                    .execute(conn)?;
                    if updated == 0 {
                        return Err(StorageError::Conflict(format!(
                            "lot {} changed during the sale",
                            decrement.lot_id
                        )));
                    }
                }

                diesel::insert_into(sale_records::table)
                    .values(&sale_db)
                    .execute(conn)?;
                Ok(sale_db)
            })
            .await?;
        Ok(SaleRecord::from(inserted))
    }
}

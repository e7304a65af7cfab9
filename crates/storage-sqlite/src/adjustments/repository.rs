use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use lotfolio_core::adjustments::{
    AdjustmentRepositoryTrait, CorporateActionAdjustment, NewCorporateActionAdjustment,
    NewFeeRecord,
};
use lotfolio_core::Result;

use super::model::{AdjustmentDB, FeeRecordDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{corporate_action_adjustments, fee_records};
use crate::utils::format_datetime;

/// Repository for corporate-action adjustments and their companion fee
/// records.
pub struct AdjustmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AdjustmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AdjustmentRepositoryTrait for AdjustmentRepository {
    fn get_adjustment(&self, adjustment_id: &str) -> Result<CorporateActionAdjustment> {
        let mut conn = get_connection(&self.pool)?;
        let adjustment_db = corporate_action_adjustments::table
            .select(AdjustmentDB::as_select())
            .find(adjustment_id)
            .first::<AdjustmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        adjustment_db.try_into()
    }

    fn get_active_adjustments(
        &self,
        owner_id: &str,
        account_id: &str,
        ticker: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<CorporateActionAdjustment>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = corporate_action_adjustments::table
            .filter(corporate_action_adjustments::owner_id.eq(owner_id))
            .filter(corporate_action_adjustments::account_id.eq(account_id))
            .filter(corporate_action_adjustments::ticker.eq(ticker))
            .filter(corporate_action_adjustments::is_active.eq(true))
            .select(AdjustmentDB::as_select())
            .into_boxed();
        if let Some(bound) = as_of {
            query = query
                .filter(corporate_action_adjustments::event_date.le(format_datetime(bound)));
        }
        let adjustments_db = query
            .order((
                corporate_action_adjustments::event_date.asc(),
                corporate_action_adjustments::id.asc(),
            ))
            .load::<AdjustmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        adjustments_db.into_iter().map(TryInto::try_into).collect()
    }

    fn list_adjustments(
        &self,
        owner_id: &str,
        account_id: Option<&str>,
    ) -> Result<Vec<CorporateActionAdjustment>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = corporate_action_adjustments::table
            .filter(corporate_action_adjustments::owner_id.eq(owner_id))
            .select(AdjustmentDB::as_select())
            .into_boxed();
        if let Some(account_id) = account_id {
            query = query.filter(corporate_action_adjustments::account_id.eq(account_id));
        }
        let adjustments_db = query
            .order((
                corporate_action_adjustments::event_date.asc(),
                corporate_action_adjustments::id.asc(),
            ))
            .load::<AdjustmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        adjustments_db.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_adjustment(
        &self,
        new_adjustment: NewCorporateActionAdjustment,
    ) -> Result<CorporateActionAdjustment> {
        let adjustment_db = AdjustmentDB::from(new_adjustment);
        let inserted = self
            .writer
            .exec(move |conn| {
                diesel::insert_into(corporate_action_adjustments::table)
                    .values(&adjustment_db)
                    .execute(conn)?;
                Ok(adjustment_db)
            })
            .await?;
        inserted.try_into()
    }

    async fn create_adjustment_with_fee(
        &self,
        new_adjustment: NewCorporateActionAdjustment,
        fee: NewFeeRecord,
    ) -> Result<CorporateActionAdjustment> {
        let adjustment_db = AdjustmentDB::from(new_adjustment);
        let fee_db = FeeRecordDB::from(fee);
        // One writer job, one transaction: the adjustment and its withheld
        // tax fee land together or not at all.
        let inserted = self
            .writer
            .exec(move |conn| {
                diesel::insert_into(corporate_action_adjustments::table)
                    .values(&adjustment_db)
                    .execute(conn)?;
                diesel::insert_into(fee_records::table)
                    .values(&fee_db)
                    .execute(conn)?;
                Ok(adjustment_db)
            })
            .await?;
        inserted.try_into()
    }

    async fn deactivate_adjustment(
        &self,
        adjustment_id: &str,
    ) -> Result<CorporateActionAdjustment> {
        let adjustment_id = adjustment_id.to_string();
        let updated = self
            .writer
            .exec(move |conn| {
                let adjustment_db = diesel::update(
                    corporate_action_adjustments::table.find(&adjustment_id),
                )
                .set((
                    corporate_action_adjustments::is_active.eq(false),
                    corporate_action_adjustments::updated_at.eq(format_datetime(Utc::now())),
                ))
                .get_result::<AdjustmentDB>(conn)?;
                Ok(adjustment_db)
            })
            .await?;
        updated.try_into()
    }

    async fn delete_adjustment(&self, adjustment_id: &str) -> Result<()> {
        let adjustment_id = adjustment_id.to_string();
        self.writer
            .exec(move |conn| {
                let deleted =
                    diesel::delete(corporate_action_adjustments::table.find(&adjustment_id))
                        .execute(conn)?;
                if deleted == 0 {
                    return Err(StorageError::QueryFailed(diesel::result::Error::NotFound));
                }
                Ok(())
            })
            .await
    }
}

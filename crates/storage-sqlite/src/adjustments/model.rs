//! Database models for corporate-action adjustments and fee records.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use lotfolio_core::adjustments::{
    AdjustmentKind, CorporateActionAdjustment, FeeRecord, NewCorporateActionAdjustment,
    NewFeeRecord,
};
use lotfolio_core::{Error, Result};

use crate::utils::{format_datetime, parse_datetime_string_tolerant, parse_decimal_string_tolerant};

/// Database model for corporate-action adjustments. The kind-specific
/// payload lives in nullable TEXT columns.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, Serialize, Deserialize, Debug,
    Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::corporate_action_adjustments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdjustmentDB {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub kind: String,
    pub event_date: String,
    pub dividend_per_share: Option<String>,
    pub tax_rate: Option<String>,
    pub ratio: Option<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub external_ref: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<AdjustmentDB> for CorporateActionAdjustment {
    type Error = Error;

    fn try_from(db: AdjustmentDB) -> Result<Self> {
        let kind = AdjustmentKind::from_str(&db.kind)?;
        Ok(CorporateActionAdjustment {
            kind,
            event_date: parse_datetime_string_tolerant(&db.event_date, "event_date"),
            dividend_per_share: db
                .dividend_per_share
                .as_deref()
                .map(|v| parse_decimal_string_tolerant(v, "dividend_per_share")),
            tax_rate: db
                .tax_rate
                .as_deref()
                .map(|v| parse_decimal_string_tolerant(v, "tax_rate")),
            ratio: db
                .ratio
                .as_deref()
                .map(|v| parse_decimal_string_tolerant(v, "ratio")),
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
            updated_at: parse_datetime_string_tolerant(&db.updated_at, "updated_at"),
            id: db.id,
            owner_id: db.owner_id,
            account_id: db.account_id,
            ticker: db.ticker,
            is_active: db.is_active,
            description: db.description,
            external_ref: db.external_ref,
        })
    }
}

impl From<NewCorporateActionAdjustment> for AdjustmentDB {
    fn from(new_adjustment: NewCorporateActionAdjustment) -> Self {
        let now = format_datetime(Utc::now());
        AdjustmentDB {
            id: new_adjustment
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            owner_id: new_adjustment.owner_id,
            account_id: new_adjustment.account_id,
            ticker: new_adjustment.ticker,
            kind: new_adjustment.kind.as_str().to_string(),
            event_date: format_datetime(new_adjustment.event_date),
            dividend_per_share: new_adjustment.dividend_per_share.map(|v| v.to_string()),
            tax_rate: new_adjustment.tax_rate.map(|v| v.to_string()),
            ratio: new_adjustment.ratio.map(|v| v.to_string()),
            is_active: true,
            description: new_adjustment.description,
            external_ref: new_adjustment.external_ref,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Database model for fee records.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone,
    PartialEq,
)]
#[diesel(table_name = crate::schema::fee_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeeRecordDB {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub kind: String,
    pub amount: String,
    pub record_date: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<NewFeeRecord> for FeeRecordDB {
    fn from(fee: NewFeeRecord) -> Self {
        FeeRecordDB {
            id: Uuid::new_v4().to_string(),
            owner_id: fee.owner_id,
            account_id: fee.account_id,
            kind: fee.kind,
            amount: fee.amount.to_string(),
            record_date: format_datetime(fee.record_date),
            description: fee.description,
            created_at: format_datetime(Utc::now()),
        }
    }
}

impl From<FeeRecordDB> for FeeRecord {
    fn from(db: FeeRecordDB) -> Self {
        FeeRecord {
            amount: parse_decimal_string_tolerant(&db.amount, "amount"),
            record_date: parse_datetime_string_tolerant(&db.record_date, "record_date"),
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
            id: db.id,
            owner_id: db.owner_id,
            account_id: db.account_id,
            kind: db.kind,
            description: db.description,
        }
    }
}

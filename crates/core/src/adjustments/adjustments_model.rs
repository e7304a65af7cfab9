//! Corporate-action adjustment domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::adjustments::adjustments_errors::AdjustmentError;
use crate::errors::ValidationError;
use crate::Result;

/// The supported corporate action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    CashDividend,
    StockDividend,
    StockSplit,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::CashDividend => "CASH_DIVIDEND",
            AdjustmentKind::StockDividend => "STOCK_DIVIDEND",
            AdjustmentKind::StockSplit => "STOCK_SPLIT",
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdjustmentKind {
    type Err = AdjustmentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CASH_DIVIDEND" => Ok(AdjustmentKind::CashDividend),
            "STOCK_DIVIDEND" => Ok(AdjustmentKind::StockDividend),
            "STOCK_SPLIT" => Ok(AdjustmentKind::StockSplit),
            other => Err(AdjustmentError::UnsupportedKind(other.to_string())),
        }
    }
}

/// One corporate-action event for a (owner, account, ticker) key.
///
/// The payload lives in kind-specific optional fields, validated at
/// creation. Rows may be deactivated or deleted but are never otherwise
/// mutated; inactive rows are excluded from every derived calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateActionAdjustment {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub kind: AdjustmentKind,
    pub event_date: DateTime<Utc>,
    /// CASH_DIVIDEND: gross dividend per share.
    pub dividend_per_share: Option<Decimal>,
    /// CASH_DIVIDEND: withholding tax rate in [0, 1].
    pub tax_rate: Option<Decimal>,
    /// STOCK_DIVIDEND / STOCK_SPLIT: multiplicative new/old share factor.
    pub ratio: Option<Decimal>,
    pub is_active: bool,
    pub description: Option<String>,
    /// Caller-owned reference for external dedup (intake itself is not
    /// idempotent).
    pub external_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for persisting a corporate-action adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCorporateActionAdjustment {
    pub id: Option<String>,
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub kind: AdjustmentKind,
    pub event_date: DateTime<Utc>,
    pub dividend_per_share: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub ratio: Option<Decimal>,
    pub description: Option<String>,
    pub external_ref: Option<String>,
}

impl NewCorporateActionAdjustment {
    /// Validates the kind-specific payload.
    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(ValidationError::MissingField("ownerId".to_string()).into());
        }
        if self.account_id.trim().is_empty() {
            return Err(ValidationError::MissingField("accountId".to_string()).into());
        }
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        match self.kind {
            AdjustmentKind::CashDividend => {
                let per_share = self.dividend_per_share.ok_or_else(|| {
                    ValidationError::MissingField("dividendPerShare".to_string())
                })?;
                if !per_share.is_sign_positive() || per_share.is_zero() {
                    return Err(AdjustmentError::InvalidPayload(
                        "dividend per share must be positive".to_string(),
                    )
                    .into());
                }
                let tax_rate = self
                    .tax_rate
                    .ok_or_else(|| ValidationError::MissingField("taxRate".to_string()))?;
                if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
                    return Err(AdjustmentError::InvalidPayload(
                        "tax rate must be between 0 and 1".to_string(),
                    )
                    .into());
                }
            }
            AdjustmentKind::StockDividend | AdjustmentKind::StockSplit => {
                let ratio = self
                    .ratio
                    .ok_or_else(|| ValidationError::MissingField("ratio".to_string()))?;
                if !ratio.is_sign_positive() || ratio.is_zero() {
                    return Err(AdjustmentError::InvalidPayload(
                        "ratio must be positive".to_string(),
                    )
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// A purchase lot with corporate actions folded in. Derived view only;
/// the stored lot is never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedLot {
    pub lot_id: String,
    pub purchase_date: DateTime<Utc>,
    pub adjusted_quantity: i64,
    pub adjusted_remaining: i64,
    /// May be negative after large cash dividends; callers must not assume
    /// non-negativity.
    pub adjusted_total_cost: Decimal,
    pub adjusted_cost_per_share: Decimal,
    pub adjustments_applied: usize,
}

/// Adjusted per-key position totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedPosition {
    pub account_id: String,
    pub ticker: String,
    pub total_quantity: i64,
    pub total_cost: Decimal,
    pub average_cost: Decimal,
    pub adjustments_applied: usize,
}

impl AdjustedPosition {
    /// The zero-valued position reported when a key holds no open lots.
    pub fn empty(account_id: &str, ticker: &str) -> Self {
        AdjustedPosition {
            account_id: account_id.to_string(),
            ticker: ticker.to_string(),
            total_quantity: 0,
            total_cost: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            adjustments_applied: 0,
        }
    }
}

/// A fee ledger row written by the cash-dividend intake for withheld tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub kind: String,
    pub amount: Decimal,
    pub record_date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a fee record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeeRecord {
    pub owner_id: String,
    pub account_id: String,
    pub kind: String,
    pub amount: Decimal,
    pub record_date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Intake payload for a cash dividend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashDividendInput {
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub event_date: DateTime<Utc>,
    pub dividend_per_share: Decimal,
    /// Withholding tax rate in [0, 1].
    pub tax_rate: Decimal,
    pub description: Option<String>,
    pub external_ref: Option<String>,
}

/// Intake payload for a stock dividend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDividendInput {
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub event_date: DateTime<Utc>,
    /// Multiplicative new/old share factor.
    pub ratio: Decimal,
    pub description: Option<String>,
    pub external_ref: Option<String>,
}

/// Intake payload for a stock split.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSplitInput {
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub event_date: DateTime<Utc>,
    /// Multiplicative new/old share factor (2.0 for a 2-for-1 split).
    pub ratio: Decimal,
    pub description: Option<String>,
    pub external_ref: Option<String>,
}

//! Intake payloads for the FIFO ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::Result;

/// Input for booking a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyInput {
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub quantity: i64,
    pub price_per_share: Decimal,
    pub fee: Decimal,
    pub purchase_date: DateTime<Utc>,
}

impl BuyInput {
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.owner_id, &self.account_id, &self.ticker)?;
        if self.quantity <= 0 {
            return Err(
                ValidationError::InvalidInput("quantity must be positive".to_string()).into(),
            );
        }
        if !self.price_per_share.is_sign_positive() || self.price_per_share.is_zero() {
            return Err(ValidationError::InvalidInput("price must be positive".to_string()).into());
        }
        if self.fee.is_sign_negative() {
            return Err(
                ValidationError::InvalidInput("fee must not be negative".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// Input for booking a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellInput {
    pub owner_id: String,
    pub account_id: String,
    pub ticker: String,
    pub quantity: i64,
    pub price_per_share: Decimal,
    pub fee: Decimal,
    /// Selling tax rate in percent (e.g. 0.23 for 0.23%).
    pub tax_rate_percent: Decimal,
    pub sell_date: DateTime<Utc>,
}

impl SellInput {
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.owner_id, &self.account_id, &self.ticker)?;
        if self.quantity <= 0 {
            return Err(
                ValidationError::InvalidInput("quantity must be positive".to_string()).into(),
            );
        }
        if !self.price_per_share.is_sign_positive() || self.price_per_share.is_zero() {
            return Err(ValidationError::InvalidInput("price must be positive".to_string()).into());
        }
        if self.fee.is_sign_negative() {
            return Err(
                ValidationError::InvalidInput("fee must not be negative".to_string()).into(),
            );
        }
        if self.tax_rate_percent.is_sign_negative() {
            return Err(ValidationError::InvalidInput(
                "tax rate must not be negative".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

fn validate_key(owner_id: &str, account_id: &str, ticker: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(ValidationError::MissingField("ownerId".to_string()).into());
    }
    if account_id.trim().is_empty() {
        return Err(ValidationError::MissingField("accountId".to_string()).into());
    }
    if ticker.trim().is_empty() {
        return Err(ValidationError::MissingField("ticker".to_string()).into());
    }
    Ok(())
}

//! Position summary display model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net position for one (account, ticker) pair.
///
/// Display aggregate only: the cost figures come from a weighted-average
/// replay, not from FIFO lot relief (see [`crate::positions::PositionsService`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSummary {
    pub account_id: String,
    pub ticker: String,
    pub quantity: i64,
    pub total_cost: Decimal,
    pub average_cost: Decimal,
    /// Date of the earliest purchase contributing to the position.
    pub inception_date: DateTime<Utc>,
}

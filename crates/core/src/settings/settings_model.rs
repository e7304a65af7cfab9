//! Settings domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Application settings.
///
/// The tax rates are defaults the API layer offers when an intake call
/// does not carry its own rate; the ledger itself always works with the
/// rate passed on the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_currency: String,
    /// Default selling tax rate in percent.
    pub default_sell_tax_rate: Decimal,
    /// Default dividend withholding tax rate in [0, 1].
    pub default_dividend_tax_rate: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_currency: "USD".to_string(),
            default_sell_tax_rate: Decimal::ZERO,
            default_dividend_tax_rate: Decimal::ZERO,
        }
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub base_currency: Option<String>,
    pub default_sell_tax_rate: Option<Decimal>,
    pub default_dividend_tax_rate: Option<Decimal>,
}

/// Decimal precision for monetary amounts on outcome boundaries.
pub const MONEY_DECIMAL_PRECISION: u32 = 4;

/// Decimal precision for display aggregates.
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Fee record kind written by the cash dividend intake for withheld tax.
pub const FEE_KIND_DIVIDEND_TAX: &str = "DIVIDEND_TAX";

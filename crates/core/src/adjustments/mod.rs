//! Corporate-action adjustments module - adjustment store models, the pure
//! adjusted-cost-basis calculator, and the intake service.

mod adjustments_calculator;
mod adjustments_errors;
mod adjustments_model;
mod adjustments_service;
mod adjustments_traits;



pub use adjustments_calculator::apply_adjustments;
pub use adjustments_errors::AdjustmentError;
pub use adjustments_model::{
    AdjustedLot, AdjustedPosition, AdjustmentKind, CashDividendInput, CorporateActionAdjustment,
    FeeRecord, NewCorporateActionAdjustment, NewFeeRecord, StockDividendInput, StockSplitInput,
};
pub use adjustments_service::AdjustmentService;
pub use adjustments_traits::{AdjustmentRepositoryTrait, AdjustmentServiceTrait};

//! Lot store module - purchase lots, sale records, and the persistence port.

mod lots_model;
mod lots_traits;


pub use lots_model::{
    normalize_ticker, LotConsumption, LotDecrement, NewPurchaseLot, NewSaleRecord, PurchaseLot,
    SaleRecord, SellOutcome,
};
pub use lots_traits::LotRepositoryTrait;

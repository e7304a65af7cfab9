//! Position aggregation module - per-ticker display summaries.

mod positions_model;
mod positions_service;


pub use positions_model::PositionSummary;
pub use positions_service::{PositionsService, PositionsServiceTrait};

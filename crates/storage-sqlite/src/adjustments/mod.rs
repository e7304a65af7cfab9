mod model;
mod repository;

pub use model::{AdjustmentDB, FeeRecordDB};
pub use repository::AdjustmentRepository;

mod model;
mod repository;

pub use model::{PurchaseLotDB, SaleRecordDB};
pub use repository::LotRepository;

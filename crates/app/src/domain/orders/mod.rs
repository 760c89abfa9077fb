//! Orders and settlement

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;
pub mod settlement;

pub use errors::{OrdersServiceError, SettlementError};
pub(crate) use repository::PgOrdersRepository;
pub use service::*;
pub use settlement::*;

//! Currency and exchange rates

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::RatesServiceError;
pub(crate) use repository::PgRatesRepository;
pub use service::*;

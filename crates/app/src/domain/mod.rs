//! Vitrine Domain Concerns

pub mod coupons;
pub mod orders;
pub mod payments;
pub mod products;
pub mod rates;
pub mod users;

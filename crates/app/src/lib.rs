//! Persistence, coupon validation and order settlement for the Vitrine storefront.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

pub mod uuids;

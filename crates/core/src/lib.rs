//! Vitrine
//!
//! Coupon discount evaluation for the Vitrine storefront. Everything in this crate is pure:
//! carts go in, discounts and their breakdowns come out, and no I/O happens along the way.

pub mod cart;
pub mod coupons;
pub mod discounts;
pub mod evaluation;
pub mod rates;

//! Coupon Handlers

pub(crate) mod apply;

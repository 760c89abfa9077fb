//! Order Data

use crate::domain::{
    coupons::records::CouponUuid,
    orders::records::{OrderItemUuid, OrderUuid},
    products::records::ProductUuid,
    users::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: Option<UserUuid>,
    pub currency: String,
    pub total: u64,
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price: u64,
}

/// A verified notice from the payment gateway that an order has been paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub order_uuid: OrderUuid,
    pub provider_payment_id: String,

    /// Coupon priced into the payment, if any
    pub coupon_uuid: Option<CouponUuid>,

    /// Discount the coupon granted, in minor units of the order currency
    pub discount_applied: Option<u64>,
}

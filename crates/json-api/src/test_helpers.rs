//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use vitrine_app::{
    context::AppContext,
    domain::{
        coupons::MockCouponsService,
        orders::{MockOrdersService, MockSettlementService},
        payments::{WebhookVerifier, signature::DEFAULT_TOLERANCE},
        products::MockProductsService,
        rates::MockRatesService,
    },
};

use crate::state::State;

const TEST_WEBHOOK_SECRET: &str = "whsec_test";

pub(crate) fn test_verifier() -> WebhookVerifier {
    WebhookVerifier::new(TEST_WEBHOOK_SECRET, DEFAULT_TOLERANCE)
}

fn strict_coupons_mock() -> MockCouponsService {
    let mut coupons = MockCouponsService::new();

    coupons.expect_create_coupon().never();
    coupons.expect_get_coupon().never();
    coupons.expect_list_coupons().never();
    coupons.expect_update_coupon().never();
    coupons.expect_replace_rules().never();
    coupons.expect_validate_coupon().never();
    coupons.expect_apply_coupon().never();

    coupons
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_get_order().never();

    orders
}

fn strict_settlement_mock() -> MockSettlementService {
    let mut settlement = MockSettlementService::new();

    settlement.expect_settle().never();

    settlement
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_get_product().never();
    products.expect_create_product().never();

    products
}

fn strict_rates_mock() -> MockRatesService {
    let mut rates = MockRatesService::new();

    rates.expect_get_rates().never();
    rates.expect_set_base_currency().never();
    rates.expect_set_rate().never();

    rates
}

fn strict_app() -> AppContext {
    AppContext {
        coupons: Arc::new(strict_coupons_mock()),
        orders: Arc::new(strict_orders_mock()),
        settlement: Arc::new(strict_settlement_mock()),
        products: Arc::new(strict_products_mock()),
        rates: Arc::new(strict_rates_mock()),
    }
}

fn service_with(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::shared(app, test_verifier())))
            .push(route),
    )
}

pub(crate) fn coupons_service(coupons: MockCouponsService, route: Router) -> Service {
    service_with(
        AppContext {
            coupons: Arc::new(coupons),
            ..strict_app()
        },
        route,
    )
}

pub(crate) fn settlement_service(settlement: MockSettlementService, route: Router) -> Service {
    service_with(
        AppContext {
            settlement: Arc::new(settlement),
            ..strict_app()
        },
        route,
    )
}

pub(crate) fn rates_service(rates: MockRatesService, route: Router) -> Service {
    service_with(
        AppContext {
            rates: Arc::new(rates),
            ..strict_app()
        },
        route,
    )
}

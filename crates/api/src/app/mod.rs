//! Application wiring: state, router, route modules.

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use contaerp_auth::{Hs256JwtIssuer, JwtValidator};

pub use services::AppServices;

use crate::middleware::require_auth;

#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub validator: Arc<dyn JwtValidator>,
    pub issuer: Arc<Hs256JwtIssuer>,
}

/// Build the full router. `/health` and `/auth/login` are public; everything
/// else sits behind bearer authentication.
pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        // tenancy
        .route(
            "/companies",
            post(routes::tenancy::create_company).get(routes::tenancy::list_companies),
        )
        .route(
            "/companies/:id",
            get(routes::tenancy::get_company)
                .put(routes::tenancy::update_company)
                .delete(routes::tenancy::deactivate_company),
        )
        .route(
            "/settings",
            post(routes::tenancy::create_setting).get(routes::tenancy::list_settings),
        )
        .route("/settings/:key", put(routes::tenancy::update_setting))
        .route("/users", get(routes::tenancy::list_users))
        .route(
            "/users/:id",
            get(routes::tenancy::get_user).delete(routes::tenancy::deactivate_user),
        )
        // parties
        .route(
            "/people",
            post(routes::parties::create_person).get(routes::parties::list_people),
        )
        .route(
            "/people/:id",
            get(routes::parties::get_person)
                .put(routes::parties::update_person)
                .delete(routes::parties::deactivate_person),
        )
        .route(
            "/customers",
            post(routes::parties::create_customer).get(routes::parties::list_customers),
        )
        .route("/customers/:id", get(routes::parties::get_customer))
        .route(
            "/customers/:id/credit-limit",
            put(routes::parties::set_credit_limit),
        )
        .route(
            "/suppliers",
            post(routes::parties::create_supplier).get(routes::parties::list_suppliers),
        )
        .route("/suppliers/:id", get(routes::parties::get_supplier))
        .route(
            "/employees",
            post(routes::parties::create_employee).get(routes::parties::list_employees),
        )
        .route("/employees/:id", get(routes::parties::get_employee))
        .route(
            "/employees/:id/terminate",
            post(routes::parties::terminate_employee),
        )
        // catalog
        .route(
            "/categories",
            post(routes::catalog::create_category).get(routes::catalog::list_categories),
        )
        .route(
            "/categories/:id",
            delete(routes::catalog::deactivate_category),
        )
        .route(
            "/categories/:id/parent",
            put(routes::catalog::reparent_category),
        )
        .route(
            "/units",
            post(routes::catalog::create_unit).get(routes::catalog::list_units),
        )
        .route(
            "/units/:id",
            delete(routes::catalog::deactivate_unit),
        )
        .route(
            "/products",
            post(routes::catalog::create_product).get(routes::catalog::list_products),
        )
        .route(
            "/products/:id",
            get(routes::catalog::get_product).delete(routes::catalog::deactivate_product),
        )
        .route("/products/:id/prices", put(routes::catalog::set_prices))
        .route(
            "/products/:id/thresholds",
            put(routes::catalog::set_thresholds),
        )
        // ledger configuration
        .route(
            "/accounts",
            post(routes::ledger::create_account).get(routes::ledger::list_accounts),
        )
        .route(
            "/accounts/:id",
            get(routes::ledger::get_account).delete(routes::ledger::deactivate_account),
        )
        .route("/accounts/:id/parent", put(routes::ledger::reparent_account))
        .route(
            "/cost-centers",
            post(routes::ledger::create_cost_center).get(routes::ledger::list_cost_centers),
        )
        .route(
            "/cost-centers/:id",
            get(routes::ledger::get_cost_center).delete(routes::ledger::deactivate_cost_center),
        )
        .route(
            "/cost-centers/:id/parent",
            put(routes::ledger::reparent_cost_center),
        )
        // financial
        .route(
            "/banks",
            post(routes::financial::create_bank).get(routes::financial::list_banks),
        )
        .route(
            "/bank-accounts",
            post(routes::financial::create_bank_account).get(routes::financial::list_bank_accounts),
        )
        .route(
            "/payment-methods",
            post(routes::financial::create_payment_method)
                .get(routes::financial::list_payment_methods),
        )
        .route(
            "/payment-methods/:id/fee",
            put(routes::financial::set_payment_method_fee),
        )
        .route(
            "/receivables",
            post(routes::financial::create_receivable).get(routes::financial::list_receivables),
        )
        .route("/receivables/:id", get(routes::financial::get_receivable))
        .route(
            "/receivables/:id/adjust",
            post(routes::financial::adjust_receivable),
        )
        .route(
            "/receivables/:id/settle",
            post(routes::financial::settle_receivable),
        )
        .route(
            "/receivables/:id/cancel",
            post(routes::financial::cancel_receivable),
        )
        .route(
            "/payables",
            post(routes::financial::create_payable).get(routes::financial::list_payables),
        )
        .route("/payables/:id", get(routes::financial::get_payable))
        .route(
            "/payables/:id/adjust",
            post(routes::financial::adjust_payable),
        )
        .route(
            "/payables/:id/settle",
            post(routes::financial::settle_payable),
        )
        .route(
            "/payables/:id/cancel",
            post(routes::financial::cancel_payable),
        )
        .route(
            "/cash-movements",
            post(routes::financial::create_cash_movement)
                .get(routes::financial::list_cash_movements),
        )
        .route(
            "/cash-movements/:id",
            get(routes::financial::get_cash_movement),
        )
        // inventory
        .route(
            "/stock/movements",
            post(routes::inventory::record_movement),
        )
        .route(
            "/stock/movements/:product_id",
            get(routes::inventory::list_movements),
        )
        .route("/stock/records", get(routes::inventory::list_records))
        .route(
            "/stock/records/:product_id",
            get(routes::inventory::get_record),
        )
        // dashboard
        .route("/dashboard", get(routes::dashboard::summary))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .nest("/api/v1", protected)
        .with_state(state)
}

pub mod health;
pub mod holdings;
pub mod portfolios;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api/v1`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register))
        .route("/auth/login", post(users::login))
        .route("/users/:id", get(users::get_user).delete(users::deactivate_user))
        .route("/users/:id/portfolios", get(users::list_portfolios))
        .route("/portfolios", post(portfolios::create_portfolio))
        .route("/portfolios/:id", get(portfolios::get_portfolio))
        .route(
            "/portfolios/:id/holdings",
            get(portfolios::list_holdings).post(portfolios::add_holding),
        )
        .route("/portfolios/:id/valuation", get(portfolios::valuation))
        .route(
            "/portfolios/:id/allocation/:asset_type",
            get(portfolios::allocation),
        )
        .route(
            "/portfolios/:id/breakdown/:dimension",
            get(portfolios::breakdown),
        )
        .route("/portfolios/:id/snapshot", post(portfolios::record_snapshot))
        .route("/holdings/:id/price", put(holdings::update_price))
        .route("/holdings/:id", axum::routing::delete(holdings::close_holding))
}

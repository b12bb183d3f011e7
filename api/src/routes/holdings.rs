use axum::extract::{Path, State};
use axum::Json;
use fingenius_core::summary::{holding_summary, HoldingSummary};
use fingenius_core::HoldingId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceUpdate {
    pub price: Decimal,
}

/// PUT /api/v1/holdings/:id/price
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<HoldingId>,
    Json(body): Json<PriceUpdate>,
) -> ApiResult<Json<HoldingSummary>> {
    let holding = state.portfolios.update_price(id, body.price).await?;
    Ok(Json(holding_summary(&holding)))
}

/// DELETE /api/v1/holdings/:id
pub async fn close_holding(
    State(state): State<AppState>,
    Path(id): Path<HoldingId>,
) -> ApiResult<Json<HoldingSummary>> {
    let holding = state.portfolios.close_holding(id).await?;
    Ok(Json(holding_summary(&holding)))
}

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fingenius_core::portfolio::{AllocationMap, PortfolioType, SecurityType};
use fingenius_core::summary::{holding_summary, to_summary, HoldingSummary, PortfolioSummary};
use fingenius_core::valuation::{AllocationDimension, PortfolioValuation, ValuationSnapshot};
use fingenius_core::{PortfolioId, UserId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::store::{NewHolding, NewPortfolio};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub portfolio_type: PortfolioType,
    #[serde(default)]
    pub cash_balance: Decimal,
    #[serde(default)]
    pub invested_amount: Decimal,
    #[serde(default)]
    pub risk_score: Option<Decimal>,
    #[serde(default)]
    pub asset_allocation: Option<AllocationMap>,
    #[serde(default)]
    pub sector_allocation: Option<AllocationMap>,
    #[serde(default)]
    pub geographic_allocation: Option<AllocationMap>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddHoldingRequest {
    pub symbol: String,
    #[serde(default)]
    pub security_name: String,
    pub security_type: SecurityType,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub cusip: Option<String>,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub portfolio_id: PortfolioId,
    pub asset_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub portfolio_id: PortfolioId,
    pub dimension: AllocationDimension,
    /// Percent of the live total per bucket
    pub allocation: BTreeMap<String, f64>,
}

/// POST /api/v1/portfolios
pub async fn create_portfolio(
    State(state): State<AppState>,
    Json(body): Json<CreatePortfolioRequest>,
) -> ApiResult<(StatusCode, Json<PortfolioSummary>)> {
    let portfolio = state
        .portfolios
        .create_portfolio(NewPortfolio {
            user_id: body.user_id,
            name: body.name,
            description: body.description,
            portfolio_type: body.portfolio_type,
            cash_balance: body.cash_balance,
            invested_amount: body.invested_amount,
            risk_score: body.risk_score,
            asset_allocation: body.asset_allocation,
            sector_allocation: body.sector_allocation,
            geographic_allocation: body.geographic_allocation,
            is_public: body.is_public,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(to_summary(&portfolio))))
}

/// GET /api/v1/portfolios/:id
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<PortfolioId>,
) -> ApiResult<Json<PortfolioSummary>> {
    let portfolio = state.portfolios.get_portfolio(id).await?;
    Ok(Json(to_summary(&portfolio)))
}

/// GET /api/v1/portfolios/:id/holdings
pub async fn list_holdings(
    State(state): State<AppState>,
    Path(id): Path<PortfolioId>,
) -> ApiResult<Json<Vec<HoldingSummary>>> {
    let holdings = state.portfolios.holdings(id).await?;
    Ok(Json(holdings.iter().map(holding_summary).collect()))
}

/// POST /api/v1/portfolios/:id/holdings
pub async fn add_holding(
    State(state): State<AppState>,
    Path(id): Path<PortfolioId>,
    Json(body): Json<AddHoldingRequest>,
) -> ApiResult<(StatusCode, Json<HoldingSummary>)> {
    let holding = state
        .portfolios
        .add_holding(NewHolding {
            portfolio_id: id,
            symbol: body.symbol,
            security_name: body.security_name,
            security_type: body.security_type,
            isin: body.isin,
            cusip: body.cusip,
            quantity: body.quantity,
            average_cost: body.average_cost,
            current_price: body.current_price,
            sector: body.sector,
            industry: body.industry,
            country: body.country,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(holding_summary(&holding))))
}

/// GET /api/v1/portfolios/:id/valuation
pub async fn valuation(
    State(state): State<AppState>,
    Path(id): Path<PortfolioId>,
) -> ApiResult<Json<PortfolioValuation>> {
    Ok(Json(state.valuation.valuation(id).await?))
}

/// GET /api/v1/portfolios/:id/allocation/:asset_type
pub async fn allocation(
    State(state): State<AppState>,
    Path((id, asset_type)): Path<(PortfolioId, String)>,
) -> ApiResult<Json<AllocationResponse>> {
    let percentage = state
        .valuation
        .allocation_percentage(id, &asset_type)
        .await?;
    Ok(Json(AllocationResponse {
        portfolio_id: id,
        asset_type,
        percentage,
    }))
}

/// GET /api/v1/portfolios/:id/breakdown/:dimension
pub async fn breakdown(
    State(state): State<AppState>,
    Path((id, dimension)): Path<(PortfolioId, String)>,
) -> ApiResult<Json<BreakdownResponse>> {
    let dimension: AllocationDimension = dimension.parse().map_err(ApiError::Unprocessable)?;
    let allocation = state.valuation.allocation_breakdown(id, dimension).await?;
    Ok(Json(BreakdownResponse {
        portfolio_id: id,
        dimension,
        allocation: allocation
            .into_iter()
            .map(|(bucket, percent)| (bucket, percent.to_f64().unwrap_or_default()))
            .collect(),
    }))
}

/// POST /api/v1/portfolios/:id/snapshot
pub async fn record_snapshot(
    State(state): State<AppState>,
    Path(id): Path<PortfolioId>,
) -> ApiResult<Json<ValuationSnapshot>> {
    Ok(Json(state.valuation.record_snapshot(id).await?))
}

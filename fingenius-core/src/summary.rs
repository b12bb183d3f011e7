//! Serialized field contracts for API clients.
//!
//! Field names and JSON types here are a compatibility surface. Absent
//! timestamps serialize as `null`, never omitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::identity::{KycStatus, RiskTolerance, User};
use crate::portfolio::{AllocationMap, Holding, Portfolio, PortfolioType, SecurityType};
use crate::{HoldingId, PortfolioId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub id: PortfolioId,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: PortfolioType,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub invested_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub risk_score: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub sharpe_ratio: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_return: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub annualized_return: Option<Decimal>,
    pub asset_allocation: Option<AllocationMap>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub ai_fit_score: Option<Decimal>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn to_summary(portfolio: &Portfolio) -> PortfolioSummary {
    PortfolioSummary {
        id: portfolio.id,
        name: portfolio.name.clone(),
        description: portfolio.description.clone(),
        portfolio_type: portfolio.portfolio_type.clone(),
        total_value: portfolio.total_value,
        cash_balance: portfolio.cash_balance,
        invested_amount: portfolio.invested_amount,
        risk_score: portfolio.risk_score,
        sharpe_ratio: portfolio.sharpe_ratio,
        total_return: portfolio.total_return,
        annualized_return: portfolio.annualized_return,
        asset_allocation: portfolio.asset_allocation.clone(),
        ai_fit_score: portfolio.ai_fit_score,
        is_active: portfolio.is_active,
        created_at: portfolio.created_at,
        last_updated: portfolio.last_updated,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingSummary {
    pub id: HoldingId,
    pub symbol: String,
    pub security_name: String,
    pub security_type: SecurityType,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub current_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub current_value: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub unrealized_gain_loss: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unrealized_gain_loss_percent: Decimal,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

pub fn holding_summary(holding: &Holding) -> HoldingSummary {
    HoldingSummary {
        id: holding.id,
        symbol: holding.symbol.clone(),
        security_name: holding.security_name.clone(),
        security_type: holding.security_type.clone(),
        quantity: holding.quantity,
        average_cost: holding.average_cost,
        current_price: holding.current_price,
        current_value: holding.current_value,
        unrealized_gain_loss: holding.unrealized_gain_loss,
        unrealized_gain_loss_percent: holding.unrealized_gain_loss_percent,
        sector: holding.sector.clone(),
        industry: holding.industry.clone(),
        country: holding.country.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub risk_tolerance: Option<RiskTolerance>,
    pub kyc_status: KycStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

pub fn user_summary(user: &User) -> UserSummary {
    UserSummary {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        full_name: user.full_name(),
        is_active: user.is_active,
        is_verified: user.is_verified,
        risk_tolerance: user.risk_tolerance,
        kyc_status: user.kyc_status,
        created_at: user.created_at,
        last_login: user.last_login,
    }
}

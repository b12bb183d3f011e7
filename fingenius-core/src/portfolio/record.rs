//! Portfolio record

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::AllocationMap;
use crate::{PortfolioId, UserId};

/// Legal structure of a portfolio
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PortfolioType {
    #[default]
    Individual,
    Joint,
    Trust,
    Retirement,
    Custodial,
    Margin,
    /// Any type this build does not know about, kept verbatim
    Other(String),
}

impl PortfolioType {
    pub fn as_str(&self) -> &str {
        match self {
            PortfolioType::Individual => "individual",
            PortfolioType::Joint => "joint",
            PortfolioType::Trust => "trust",
            PortfolioType::Retirement => "retirement",
            PortfolioType::Custodial => "custodial",
            PortfolioType::Margin => "margin",
            PortfolioType::Other(other) => other,
        }
    }

    pub fn is_margin(&self) -> bool {
        matches!(self, PortfolioType::Margin)
    }
}

impl From<&str> for PortfolioType {
    fn from(value: &str) -> Self {
        match value {
            "individual" => PortfolioType::Individual,
            "joint" => PortfolioType::Joint,
            "trust" => PortfolioType::Trust,
            "retirement" => PortfolioType::Retirement,
            "custodial" => PortfolioType::Custodial,
            "margin" => PortfolioType::Margin,
            other => PortfolioType::Other(other.to_string()),
        }
    }
}

impl From<String> for PortfolioType {
    fn from(value: String) -> Self {
        PortfolioType::from(value.as_str())
    }
}

impl From<PortfolioType> for String {
    fn from(value: PortfolioType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PortfolioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An investment portfolio owned by one user.
///
/// `total_value` is the last persisted snapshot. It is only rewritten by an
/// explicit snapshot write and may lag the live total derived from holdings;
/// use [`crate::valuation::total_portfolio_value`] for the live figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: PortfolioId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: PortfolioType,

    pub total_value: Decimal,
    pub cash_balance: Decimal,
    pub invested_amount: Decimal,

    /// 1-10 scale
    pub risk_score: Option<Decimal>,
    pub sharpe_ratio: Option<Decimal>,
    pub volatility: Option<Decimal>,
    pub beta: Option<Decimal>,

    pub asset_allocation: Option<AllocationMap>,
    pub sector_allocation: Option<AllocationMap>,
    pub geographic_allocation: Option<AllocationMap>,

    pub total_return: Decimal,
    pub annualized_return: Option<Decimal>,
    pub max_drawdown: Option<Decimal>,

    /// How well the portfolio matches the owner's profile
    pub ai_fit_score: Option<Decimal>,
    pub last_rebalancing_date: Option<DateTime<Utc>>,
    pub next_rebalancing_date: Option<DateTime<Utc>>,

    pub is_active: bool,
    pub is_public: bool,

    /// Bumped on every snapshot write; used for optimistic concurrency
    pub version: i64,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Portfolio {
    /// Create an empty, active individual portfolio
    pub fn new(id: PortfolioId, user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            description: None,
            portfolio_type: PortfolioType::Individual,
            total_value: Decimal::ZERO,
            cash_balance: Decimal::ZERO,
            invested_amount: Decimal::ZERO,
            risk_score: None,
            sharpe_ratio: None,
            volatility: None,
            beta: None,
            asset_allocation: None,
            sector_allocation: None,
            geographic_allocation: None,
            total_return: Decimal::ZERO,
            annualized_return: None,
            max_drawdown: None,
            ai_fit_score: None,
            last_rebalancing_date: None,
            next_rebalancing_date: None,
            is_active: true,
            is_public: false,
            version: 0,
            created_at: None,
            updated_at: None,
            last_updated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_type_keeps_unknown_values() {
        assert_eq!(PortfolioType::from("margin"), PortfolioType::Margin);
        assert_eq!(
            PortfolioType::from("family_office"),
            PortfolioType::Other("family_office".to_string())
        );
        assert_eq!(PortfolioType::from("family_office").as_str(), "family_office");
    }

    #[test]
    fn test_portfolio_type_serializes_as_string() {
        let json = serde_json::to_value(PortfolioType::Joint).unwrap();
        assert_eq!(json, "joint");
        let parsed: PortfolioType = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, PortfolioType::Joint);
    }
}

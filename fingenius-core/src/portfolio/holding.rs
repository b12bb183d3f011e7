//! Holding record (a single security position)

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{HoldingId, PortfolioId};

/// Security type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SecurityType {
    Stock,
    Bond,
    Etf,
    MutualFund,
    Reit,
    Crypto,
    Commodity,
    Cash,
    /// Any type this build does not know about, kept verbatim
    Other(String),
}

impl SecurityType {
    pub fn as_str(&self) -> &str {
        match self {
            SecurityType::Stock => "stock",
            SecurityType::Bond => "bond",
            SecurityType::Etf => "etf",
            SecurityType::MutualFund => "mutual_fund",
            SecurityType::Reit => "reit",
            SecurityType::Crypto => "crypto",
            SecurityType::Commodity => "commodity",
            SecurityType::Cash => "cash",
            SecurityType::Other(other) => other,
        }
    }
}

impl From<&str> for SecurityType {
    fn from(value: &str) -> Self {
        match value {
            "stock" => SecurityType::Stock,
            "bond" => SecurityType::Bond,
            "etf" => SecurityType::Etf,
            "mutual_fund" => SecurityType::MutualFund,
            "reit" => SecurityType::Reit,
            "crypto" => SecurityType::Crypto,
            "commodity" => SecurityType::Commodity,
            "cash" => SecurityType::Cash,
            other => SecurityType::Other(other.to_string()),
        }
    }
}

impl From<String> for SecurityType {
    fn from(value: String) -> Self {
        SecurityType::from(value.as_str())
    }
}

impl From<SecurityType> for String {
    fn from(value: SecurityType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A security position inside a portfolio.
///
/// `current_value` and the `unrealized_*` fields are the values stored at the
/// last price refresh. Live figures come from the valuation functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: HoldingId,
    pub portfolio_id: PortfolioId,

    pub symbol: String,
    pub security_name: String,
    pub security_type: SecurityType,
    pub isin: Option<String>,
    pub cusip: Option<String>,

    /// Signed; negative for short positions
    pub quantity: Decimal,
    pub average_cost: Decimal,
    /// `None` when the price feed has nothing for this symbol
    pub current_price: Option<Decimal>,
    pub current_value: Option<Decimal>,

    pub unrealized_gain_loss: Decimal,
    pub unrealized_gain_loss_percent: Decimal,
    pub total_return: Decimal,

    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Holding {
    /// Create an empty, unpriced position
    pub fn new(
        id: HoldingId,
        portfolio_id: PortfolioId,
        symbol: impl Into<String>,
        security_name: impl Into<String>,
        security_type: SecurityType,
    ) -> Self {
        Self {
            id,
            portfolio_id,
            symbol: symbol.into(),
            security_name: security_name.into(),
            security_type,
            isin: None,
            cusip: None,
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            current_price: None,
            current_value: None,
            unrealized_gain_loss: Decimal::ZERO,
            unrealized_gain_loss_percent: Decimal::ZERO,
            total_return: Decimal::ZERO,
            sector: None,
            industry: None,
            country: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_priced(&self) -> bool {
        self.current_price.is_some()
    }

    /// A position with zero quantity is closed
    pub fn is_closed(&self) -> bool {
        self.quantity.is_zero()
    }
}

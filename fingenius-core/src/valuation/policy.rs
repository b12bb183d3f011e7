//! Cash-balance rules

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::portfolio::Portfolio;

/// Decides whether a portfolio's cash balance is in a valid state.
///
/// What counts as invalid is a business rule, so it is injected into the
/// valuation functions rather than hard-coded there.
pub trait CashPolicy: Send + Sync {
    fn check(&self, portfolio: &Portfolio) -> Result<()>;
}

/// Cash policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashPolicyConfig {
    /// Allow margin portfolios to carry a negative cash balance
    pub allow_margin: bool,
    /// Largest debit (as a positive amount) a margin portfolio may carry
    pub max_margin_debit: Option<Decimal>,
}

impl Default for CashPolicyConfig {
    fn default() -> Self {
        Self {
            allow_margin: true,
            max_margin_debit: None,
        }
    }
}

/// Negative cash is only valid on margin portfolios.
#[derive(Debug, Clone, Default)]
pub struct MarginAwareCashPolicy {
    config: CashPolicyConfig,
}

impl MarginAwareCashPolicy {
    pub fn new(config: CashPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CashPolicyConfig {
        &self.config
    }
}

impl CashPolicy for MarginAwareCashPolicy {
    fn check(&self, portfolio: &Portfolio) -> Result<()> {
        let cash = portfolio.cash_balance;
        if cash >= Decimal::ZERO {
            return Ok(());
        }

        if !portfolio.portfolio_type.is_margin() {
            return Err(Error::InvalidState(format!(
                "portfolio {} ({}) has negative cash balance {}",
                portfolio.id, portfolio.portfolio_type, cash
            )));
        }

        if !self.config.allow_margin {
            return Err(Error::InvalidState(format!(
                "portfolio {} has negative cash balance {} and margin is disabled",
                portfolio.id, cash
            )));
        }

        if let Some(limit) = self.config.max_margin_debit {
            if -cash > limit {
                return Err(Error::InvalidState(format!(
                    "portfolio {} margin debit {} exceeds limit {}",
                    portfolio.id, -cash, limit
                )));
            }
        }

        Ok(())
    }
}

/// Accepts any cash balance
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveCashPolicy;

impl CashPolicy for PermissiveCashPolicy {
    fn check(&self, _portfolio: &Portfolio) -> Result<()> {
        Ok(())
    }
}

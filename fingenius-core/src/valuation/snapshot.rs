//! Snapshot of the live total, to be written back by the caller

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::portfolio::{Holding, Portfolio};
use crate::valuation::{ensure_within, total_portfolio_value, CashPolicy, MAX_STORED_AMOUNT};
use crate::PortfolioId;

/// A recomputed total ready to be persisted into `Portfolio::total_value`.
///
/// `expected_version` is the portfolio version the total was derived from.
/// A store must only apply the snapshot while the stored version still
/// matches, so at most one concurrent writer wins per version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuationSnapshot {
    pub portfolio_id: PortfolioId,
    pub expected_version: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl ValuationSnapshot {
    /// Whether `portfolio` is still at the version this snapshot was taken from
    pub fn is_current_for(&self, portfolio: &Portfolio) -> bool {
        portfolio.id == self.portfolio_id && portfolio.version == self.expected_version
    }

    /// Write the snapshot into `portfolio` and bump its version
    pub fn apply_to(&self, portfolio: &mut Portfolio) {
        portfolio.total_value = self.total_value;
        portfolio.last_updated = Some(self.recorded_at);
        portfolio.version = self.expected_version + 1;
    }
}

/// Derive a snapshot of the live total at `at`.
///
/// A total too large for the stored column is an [`Error::InvalidState`](crate::Error::InvalidState).
pub fn snapshot(
    portfolio: &Portfolio,
    holdings: &[Holding],
    policy: &dyn CashPolicy,
    at: DateTime<Utc>,
) -> Result<ValuationSnapshot> {
    let total_value = total_portfolio_value(portfolio, holdings, policy)?;
    ensure_within("total_value", total_value, MAX_STORED_AMOUNT)?;
    Ok(ValuationSnapshot {
        portfolio_id: portfolio.id,
        expected_version: portfolio.version,
        total_value,
        recorded_at: at,
    })
}

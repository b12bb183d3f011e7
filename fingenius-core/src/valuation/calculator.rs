//! Derived figures for holdings and portfolios.
//!
//! Every function here is pure: it reads the supplied records and never
//! mutates them, so any number of readers may evaluate the same snapshot
//! concurrently. The one write path is [`reprice`], which callers invoke
//! explicitly on a price refresh.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::portfolio::{Holding, Portfolio, SecurityType};
use crate::valuation::CashPolicy;
use crate::{HoldingId, PortfolioId};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest magnitude a stored money column (`numeric(20, 8)`) accepts, exclusive
pub const MAX_STORED_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Unrealized gain or loss of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GainLoss {
    #[serde(with = "rust_decimal::serde::float")]
    pub absolute: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percent: Decimal,
}

fn overflow(what: &str) -> Error {
    Error::InvalidState(format!("{what} is outside the representable decimal range"))
}

/// Fails with [`Error::InvalidState`] when `|value| >= limit`
pub fn ensure_within(field: &str, value: Decimal, limit: Decimal) -> Result<()> {
    if value.abs() >= limit {
        return Err(Error::InvalidState(format!(
            "{field} {value} exceeds the supported magnitude {limit}"
        )));
    }
    Ok(())
}

/// `part / whole * 100`, or zero when `whole` is zero
pub fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
        .ok_or_else(|| overflow("percentage"))
}

/// `quantity * current_price`; an unpriced holding is worth zero
pub fn market_value(holding: &Holding) -> Result<Decimal> {
    holding
        .quantity
        .checked_mul(holding.current_price.unwrap_or(Decimal::ZERO))
        .ok_or_else(|| overflow("market value"))
}

/// `quantity * average_cost`
pub fn cost_basis(holding: &Holding) -> Result<Decimal> {
    holding
        .quantity
        .checked_mul(holding.average_cost)
        .ok_or_else(|| overflow("cost basis"))
}

/// Market value minus cost basis, with the percentage taken over cost basis.
/// A zero-cost position reports 0%.
pub fn unrealized_gain_loss(holding: &Holding) -> Result<GainLoss> {
    let basis = cost_basis(holding)?;
    let absolute = market_value(holding)?
        .checked_sub(basis)
        .ok_or_else(|| overflow("unrealized gain"))?;
    Ok(GainLoss {
        absolute,
        percent: percent_of(absolute, basis)?,
    })
}

/// Fails with [`Error::Consistency`] if any holding belongs to another portfolio
pub fn ensure_attached(portfolio: &Portfolio, holdings: &[Holding]) -> Result<()> {
    match holdings.iter().find(|h| h.portfolio_id != portfolio.id) {
        Some(stray) => Err(Error::Consistency(format!(
            "holding {} ({}) belongs to portfolio {}, not {}",
            stray.id, stray.symbol, stray.portfolio_id, portfolio.id
        ))),
        None => Ok(()),
    }
}

/// Sum of market values over the portfolio's holdings. Empty set is zero.
pub fn total_holdings_value(portfolio: &Portfolio, holdings: &[Holding]) -> Result<Decimal> {
    ensure_attached(portfolio, holdings)?;
    holdings.iter().try_fold(Decimal::ZERO, |acc, holding| -> Result<Decimal> {
        acc.checked_add(market_value(holding)?)
            .ok_or_else(|| overflow("holdings value"))
    })
}

/// Holdings value plus cash, after the cash balance passes `policy`
pub fn total_portfolio_value(
    portfolio: &Portfolio,
    holdings: &[Holding],
    policy: &dyn CashPolicy,
) -> Result<Decimal> {
    policy.check(portfolio)?;
    total_holdings_value(portfolio, holdings)?
        .checked_add(portfolio.cash_balance)
        .ok_or_else(|| overflow("portfolio value"))
}

/// Share of the live total held under `asset_type` in the stored asset
/// allocation map, as a percentage.
///
/// Zero when the map is absent or empty, when the key is missing, or when the
/// live total is zero.
pub fn allocation_percentage(
    portfolio: &Portfolio,
    holdings: &[Holding],
    policy: &dyn CashPolicy,
    asset_type: &str,
) -> Result<Decimal> {
    let allocation = match portfolio.asset_allocation.as_ref() {
        Some(map) if !map.is_empty() => map,
        _ => return Ok(Decimal::ZERO),
    };
    let Some(amount) = allocation.get(asset_type) else {
        return Ok(Decimal::ZERO);
    };

    let total = total_portfolio_value(portfolio, holdings, policy)?;
    percent_of(amount, total)
}

/// Per-holding line of a [`PortfolioValuation`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValuation {
    pub holding_id: HoldingId,
    pub symbol: String,
    pub security_type: SecurityType,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub current_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub market_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_basis: Decimal,
    pub unrealized: GainLoss,
    /// Percent of the live portfolio total
    #[serde(with = "rust_decimal::serde::float")]
    pub weight_percent: Decimal,
    pub priced: bool,
}

/// Full live valuation of one portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioValuation {
    pub portfolio_id: PortfolioId,
    #[serde(with = "rust_decimal::serde::float")]
    pub holdings_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cash_balance: Decimal,
    /// Live total: holdings value plus cash
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    /// Last persisted snapshot of the total
    #[serde(with = "rust_decimal::serde::float")]
    pub stored_total_value: Decimal,
    /// `total_value - stored_total_value`
    #[serde(with = "rust_decimal::serde::float")]
    pub drift: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_basis: Decimal,
    pub unrealized: GainLoss,
    pub unpriced_holdings: usize,
    pub holdings: Vec<HoldingValuation>,
}

/// Value every holding and roll the results up to the portfolio
pub fn value_portfolio(
    portfolio: &Portfolio,
    holdings: &[Holding],
    policy: &dyn CashPolicy,
) -> Result<PortfolioValuation> {
    let total_value = total_portfolio_value(portfolio, holdings, policy)?;
    let holdings_value = total_value - portfolio.cash_balance;

    let lines = holdings
        .iter()
        .map(|holding| -> Result<HoldingValuation> {
            let value = market_value(holding)?;
            Ok(HoldingValuation {
                holding_id: holding.id,
                symbol: holding.symbol.clone(),
                security_type: holding.security_type.clone(),
                quantity: holding.quantity,
                current_price: holding.current_price,
                market_value: value,
                cost_basis: cost_basis(holding)?,
                unrealized: unrealized_gain_loss(holding)?,
                weight_percent: percent_of(value, total_value)?,
                priced: holding.is_priced(),
            })
        })
        .collect::<Result<Vec<HoldingValuation>>>()?;

    let total_cost = lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        acc.checked_add(line.cost_basis)
            .ok_or_else(|| overflow("cost basis"))
    })?;
    let unrealized_total = holdings_value
        .checked_sub(total_cost)
        .ok_or_else(|| overflow("unrealized gain"))?;

    Ok(PortfolioValuation {
        portfolio_id: portfolio.id,
        holdings_value,
        cash_balance: portfolio.cash_balance,
        total_value,
        stored_total_value: portfolio.total_value,
        drift: total_value
            .checked_sub(portfolio.total_value)
            .ok_or_else(|| overflow("drift"))?,
        cost_basis: total_cost,
        unrealized: GainLoss {
            absolute: unrealized_total,
            percent: percent_of(unrealized_total, total_cost)?,
        },
        unpriced_holdings: lines.iter().filter(|l| !l.priced).count(),
        holdings: lines,
    })
}

/// Apply a fresh price to a holding and refresh its stored derived fields.
///
/// This is the explicit price-refresh write path; nothing in the read
/// functions above calls it.
pub fn reprice(holding: &mut Holding, price: Decimal, at: DateTime<Utc>) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(Error::InvalidState(format!(
            "negative price {} for {}",
            price, holding.symbol
        )));
    }

    let mut priced = holding.clone();
    priced.current_price = Some(price);
    let value = market_value(&priced)?;
    let gain = unrealized_gain_loss(&priced)?;

    holding.current_price = Some(price);
    holding.current_value = Some(value);
    holding.unrealized_gain_loss = gain.absolute;
    holding.unrealized_gain_loss_percent = gain.percent;
    holding.updated_at = Some(at);
    Ok(())
}

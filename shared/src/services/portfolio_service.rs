//! Portfolio and holding management

use std::sync::Arc;

use chrono::Utc;
use fingenius_core::portfolio::{Holding, Portfolio};
use fingenius_core::valuation::{ensure_within, reprice, CashPolicy, MAX_STORED_AMOUNT};
use fingenius_core::{HoldingId, PortfolioId, UserId};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Error, Result};
use crate::store::{NewHolding, NewPortfolio, PortfolioStore, UserStore};

/// Magnitude bound of the `numeric(10, 4)` score columns
const MAX_STORED_SCORE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Every stored money field of `holding` must fit its column
fn ensure_storable(holding: &Holding) -> Result<()> {
    ensure_within("quantity", holding.quantity, MAX_STORED_AMOUNT)?;
    ensure_within("average_cost", holding.average_cost, MAX_STORED_AMOUNT)?;
    if let Some(price) = holding.current_price {
        ensure_within("current_price", price, MAX_STORED_AMOUNT)?;
    }
    if let Some(value) = holding.current_value {
        ensure_within("current_value", value, MAX_STORED_AMOUNT)?;
    }
    ensure_within(
        "unrealized_gain_loss",
        holding.unrealized_gain_loss,
        MAX_STORED_AMOUNT,
    )?;
    Ok(())
}

pub struct PortfolioService {
    portfolios: Arc<dyn PortfolioStore>,
    users: Arc<dyn UserStore>,
    policy: Arc<dyn CashPolicy>,
}

impl PortfolioService {
    pub fn new(
        portfolios: Arc<dyn PortfolioStore>,
        users: Arc<dyn UserStore>,
        policy: Arc<dyn CashPolicy>,
    ) -> Self {
        Self {
            portfolios,
            users,
            policy,
        }
    }

    /// Create a portfolio for an existing user.
    ///
    /// The opening cash balance must satisfy the cash policy.
    pub async fn create_portfolio(&self, mut new: NewPortfolio) -> Result<Portfolio> {
        new.name = new.name.trim().to_string();
        if new.name.is_empty() {
            return Err(Error::Validation("portfolio name is required".to_string()));
        }
        if new.invested_amount < Decimal::ZERO {
            return Err(Error::Validation("invested_amount must not be negative".to_string()));
        }
        ensure_within("cash_balance", new.cash_balance, MAX_STORED_AMOUNT)?;
        ensure_within("invested_amount", new.invested_amount, MAX_STORED_AMOUNT)?;
        if let Some(score) = new.risk_score {
            ensure_within("risk_score", score, MAX_STORED_SCORE)?;
        }
        self.policy
            .check(&new.clone().into_portfolio(0, Utc::now()))?;

        let portfolio = self.portfolios.create_portfolio(new).await?;
        info!(
            portfolio_id = portfolio.id,
            user_id = portfolio.user_id,
            "Created portfolio"
        );
        Ok(portfolio)
    }

    pub async fn get_portfolio(&self, id: PortfolioId) -> Result<Portfolio> {
        self.portfolios.load_portfolio(id).await
    }

    /// Portfolios owned by a user, ordered by id
    pub async fn portfolios_of(&self, user_id: UserId) -> Result<Vec<Portfolio>> {
        if self.users.find_user(user_id).await?.is_none() {
            return Err(fingenius_core::Error::not_found("user", user_id).into());
        }
        self.portfolios.list_portfolios(user_id).await
    }

    pub async fn holdings(&self, portfolio_id: PortfolioId) -> Result<Vec<Holding>> {
        self.portfolios.load_holdings(portfolio_id).await
    }

    pub async fn add_holding(&self, mut new: NewHolding) -> Result<Holding> {
        new.symbol = new.symbol.trim().to_uppercase();
        if new.symbol.is_empty() {
            return Err(Error::Validation("symbol is required".to_string()));
        }
        if new.security_name.trim().is_empty() {
            new.security_name = new.symbol.clone();
        }
        if new.average_cost < Decimal::ZERO {
            return Err(Error::Validation("average_cost must not be negative".to_string()));
        }
        if new.quantity.is_zero() {
            return Err(Error::Validation("quantity must not be zero".to_string()));
        }
        ensure_storable(&new.clone().into_holding(0, Utc::now())?)?;

        let holding = self.portfolios.add_holding(new).await?;
        info!(
            holding_id = holding.id,
            portfolio_id = holding.portfolio_id,
            symbol = %holding.symbol,
            "Added holding"
        );
        Ok(holding)
    }

    /// Price refresh: set the current price and rewrite the stored derived fields
    pub async fn update_price(&self, holding_id: HoldingId, price: Decimal) -> Result<Holding> {
        let mut holding = self.portfolios.load_holding(holding_id).await?;
        reprice(&mut holding, price, Utc::now())?;
        ensure_storable(&holding)?;
        self.portfolios.save_holding(&holding).await?;
        Ok(holding)
    }

    /// Remove a holding from its portfolio
    pub async fn close_holding(&self, holding_id: HoldingId) -> Result<Holding> {
        let holding = self.portfolios.remove_holding(holding_id).await?;
        info!(
            holding_id,
            portfolio_id = holding.portfolio_id,
            "Closed holding"
        );
        Ok(holding)
    }
}

//! Persistence seams.
//!
//! Services only talk to these traits. [`crate::repositories`] implements
//! them over SeaORM, [`memory::InMemoryStore`] over a `PortfolioBook`.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fingenius_core::identity::User;
use fingenius_core::portfolio::{AllocationMap, Holding, Portfolio, PortfolioType, SecurityType};
use fingenius_core::valuation::{reprice, ValuationSnapshot};
use fingenius_core::{HoldingId, PortfolioId, UserId};
use rust_decimal::Decimal;

use crate::error::Result;

pub use memory::InMemoryStore;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewPortfolio {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub portfolio_type: PortfolioType,
    pub cash_balance: Decimal,
    pub invested_amount: Decimal,
    pub risk_score: Option<Decimal>,
    pub asset_allocation: Option<AllocationMap>,
    pub sector_allocation: Option<AllocationMap>,
    pub geographic_allocation: Option<AllocationMap>,
    pub is_public: bool,
}

impl NewPortfolio {
    /// Materialize the record under `id`, created at `at`
    pub fn into_portfolio(self, id: PortfolioId, at: DateTime<Utc>) -> Portfolio {
        let mut portfolio = Portfolio::new(id, self.user_id, self.name);
        portfolio.description = self.description;
        portfolio.portfolio_type = self.portfolio_type;
        portfolio.cash_balance = self.cash_balance;
        portfolio.invested_amount = self.invested_amount;
        portfolio.risk_score = self.risk_score;
        portfolio.asset_allocation = self.asset_allocation;
        portfolio.sector_allocation = self.sector_allocation;
        portfolio.geographic_allocation = self.geographic_allocation;
        portfolio.is_public = self.is_public;
        portfolio.created_at = Some(at);
        portfolio.updated_at = Some(at);
        portfolio
    }
}

#[derive(Debug, Clone)]
pub struct NewHolding {
    pub portfolio_id: PortfolioId,
    pub symbol: String,
    pub security_name: String,
    pub security_type: SecurityType,
    pub isin: Option<String>,
    pub cusip: Option<String>,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub current_price: Option<Decimal>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
}

impl NewHolding {
    /// Materialize the record under `id`. A known price fills the stored
    /// derived fields the same way a price refresh would.
    pub fn into_holding(self, id: HoldingId, at: DateTime<Utc>) -> Result<Holding> {
        let mut holding = Holding::new(
            id,
            self.portfolio_id,
            self.symbol,
            self.security_name,
            self.security_type,
        );
        holding.isin = self.isin;
        holding.cusip = self.cusip;
        holding.quantity = self.quantity;
        holding.average_cost = self.average_cost;
        holding.sector = self.sector;
        holding.industry = self.industry;
        holding.country = self.country;
        holding.created_at = Some(at);
        holding.updated_at = Some(at);
        if let Some(price) = self.current_price {
            reprice(&mut holding, price, at)?;
        }
        Ok(holding)
    }
}

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn load_portfolio(&self, id: PortfolioId) -> Result<Portfolio>;

    /// Holdings of an existing portfolio, ordered by id
    async fn load_holdings(&self, portfolio_id: PortfolioId) -> Result<Vec<Holding>>;

    async fn load_holding(&self, id: HoldingId) -> Result<Holding>;

    async fn list_portfolios(&self, user_id: UserId) -> Result<Vec<Portfolio>>;

    async fn active_portfolio_ids(&self) -> Result<Vec<PortfolioId>>;

    /// Fails with `NotFound` when the owning user does not exist
    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio>;

    /// Fails with `NotFound` when the portfolio does not exist
    async fn add_holding(&self, new: NewHolding) -> Result<Holding>;

    /// Overwrite a stored holding; one whose quantity reached zero is dropped
    async fn save_holding(&self, holding: &Holding) -> Result<()>;

    async fn remove_holding(&self, id: HoldingId) -> Result<Holding>;

    /// Compare-and-set of `total_value` on `snapshot.expected_version`.
    ///
    /// Returns the portfolio version after the write, or `SnapshotConflict`
    /// when another writer bumped the version first.
    async fn write_snapshot(&self, snapshot: &ValuationSnapshot) -> Result<i64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    /// Exact match on the normalized (lower-case) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Fails with `Duplicate` on an email or username clash
    async fn insert_user(&self, new: NewUser) -> Result<User>;

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<()>;

    async fn set_user_active(&self, id: UserId, active: bool) -> Result<User>;
}

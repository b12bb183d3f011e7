use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fingenius_core::portfolio::{AllocationMap, Holding, Portfolio};
use fingenius_core::valuation::ValuationSnapshot;
use fingenius_core::{HoldingId, PortfolioId, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use crate::entity::{holdings, portfolios, users};
use crate::error::{Error, Result};
use crate::store::{NewHolding, NewPortfolio, PortfolioStore};

pub struct PortfolioRepository {
    db: Arc<DatabaseConnection>,
}

impl PortfolioRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_portfolio(&self, id: PortfolioId) -> Result<()> {
        let count = portfolios::Entity::find_by_id(id)
            .count(self.db.as_ref())
            .await?;
        if count == 0 {
            return Err(fingenius_core::Error::not_found("portfolio", id).into());
        }
        Ok(())
    }
}

fn holding_model(holding: &Holding) -> holdings::ActiveModel {
    holdings::ActiveModel {
        id: ActiveValue::Set(holding.id),
        portfolio_id: ActiveValue::Set(holding.portfolio_id),
        symbol: ActiveValue::Set(holding.symbol.clone()),
        security_name: ActiveValue::Set(holding.security_name.clone()),
        security_type: ActiveValue::Set(holding.security_type.to_string()),
        isin: ActiveValue::Set(holding.isin.clone()),
        cusip: ActiveValue::Set(holding.cusip.clone()),
        quantity: ActiveValue::Set(holding.quantity),
        average_cost: ActiveValue::Set(holding.average_cost),
        current_price: ActiveValue::Set(holding.current_price),
        current_value: ActiveValue::Set(holding.current_value),
        unrealized_gain_loss: ActiveValue::Set(holding.unrealized_gain_loss),
        unrealized_gain_loss_percent: ActiveValue::Set(holding.unrealized_gain_loss_percent),
        total_return: ActiveValue::Set(holding.total_return),
        sector: ActiveValue::Set(holding.sector.clone()),
        industry: ActiveValue::Set(holding.industry.clone()),
        country: ActiveValue::Set(holding.country.clone()),
        created_at: ActiveValue::Set(holding.created_at),
        updated_at: ActiveValue::Set(holding.updated_at),
    }
}

fn portfolio_model(portfolio: &Portfolio) -> portfolios::ActiveModel {
    let allocation = |map: &Option<AllocationMap>| map.as_ref().map(AllocationMap::to_json);
    portfolios::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(portfolio.user_id),
        name: ActiveValue::Set(portfolio.name.clone()),
        description: ActiveValue::Set(portfolio.description.clone()),
        portfolio_type: ActiveValue::Set(portfolio.portfolio_type.to_string()),
        total_value: ActiveValue::Set(portfolio.total_value),
        cash_balance: ActiveValue::Set(portfolio.cash_balance),
        invested_amount: ActiveValue::Set(portfolio.invested_amount),
        risk_score: ActiveValue::Set(portfolio.risk_score),
        sharpe_ratio: ActiveValue::Set(portfolio.sharpe_ratio),
        volatility: ActiveValue::Set(portfolio.volatility),
        beta: ActiveValue::Set(portfolio.beta),
        asset_allocation: ActiveValue::Set(allocation(&portfolio.asset_allocation)),
        sector_allocation: ActiveValue::Set(allocation(&portfolio.sector_allocation)),
        geographic_allocation: ActiveValue::Set(allocation(&portfolio.geographic_allocation)),
        total_return: ActiveValue::Set(portfolio.total_return),
        annualized_return: ActiveValue::Set(portfolio.annualized_return),
        max_drawdown: ActiveValue::Set(portfolio.max_drawdown),
        ai_fit_score: ActiveValue::Set(portfolio.ai_fit_score),
        last_rebalancing_date: ActiveValue::Set(portfolio.last_rebalancing_date),
        next_rebalancing_date: ActiveValue::Set(portfolio.next_rebalancing_date),
        is_active: ActiveValue::Set(portfolio.is_active),
        is_public: ActiveValue::Set(portfolio.is_public),
        version: ActiveValue::Set(portfolio.version),
        created_at: ActiveValue::Set(portfolio.created_at),
        updated_at: ActiveValue::Set(portfolio.updated_at),
        last_updated: ActiveValue::Set(portfolio.last_updated),
    }
}

#[async_trait]
impl PortfolioStore for PortfolioRepository {
    async fn load_portfolio(&self, id: PortfolioId) -> Result<Portfolio> {
        let model = portfolios::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(fingenius_core::Error::not_found("portfolio", id))?;
        Ok(Portfolio::try_from(model)?)
    }

    async fn load_holdings(&self, portfolio_id: PortfolioId) -> Result<Vec<Holding>> {
        self.ensure_portfolio(portfolio_id).await?;
        let models = holdings::Entity::find()
            .filter(holdings::Column::PortfolioId.eq(portfolio_id))
            .order_by_asc(holdings::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Holding::from).collect())
    }

    async fn load_holding(&self, id: HoldingId) -> Result<Holding> {
        let model = holdings::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(fingenius_core::Error::not_found("holding", id))?;
        Ok(Holding::from(model))
    }

    async fn list_portfolios(&self, user_id: UserId) -> Result<Vec<Portfolio>> {
        let models = portfolios::Entity::find()
            .filter(portfolios::Column::UserId.eq(user_id))
            .order_by_asc(portfolios::Column::Id)
            .all(self.db.as_ref())
            .await?;
        let portfolios = models
            .into_iter()
            .map(Portfolio::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(portfolios)
    }

    async fn active_portfolio_ids(&self) -> Result<Vec<PortfolioId>> {
        let ids = portfolios::Entity::find()
            .select_only()
            .column(portfolios::Column::Id)
            .filter(portfolios::Column::IsActive.eq(true))
            .order_by_asc(portfolios::Column::Id)
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }

    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio> {
        let owner = users::Entity::find_by_id(new.user_id)
            .count(self.db.as_ref())
            .await?;
        if owner == 0 {
            return Err(fingenius_core::Error::not_found("user", new.user_id).into());
        }

        let portfolio = new.into_portfolio(0, Utc::now());
        let model = portfolios::Entity::insert(portfolio_model(&portfolio))
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(Portfolio::try_from(model)?)
    }

    async fn add_holding(&self, new: NewHolding) -> Result<Holding> {
        self.ensure_portfolio(new.portfolio_id).await?;

        let holding = new.into_holding(0, Utc::now())?;
        let mut active_model = holding_model(&holding);
        active_model.id = ActiveValue::NotSet;
        let model = holdings::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(Holding::from(model))
    }

    async fn save_holding(&self, holding: &Holding) -> Result<()> {
        let stored = self.load_holding(holding.id).await?;
        if stored.portfolio_id != holding.portfolio_id {
            return Err(fingenius_core::Error::Consistency(format!(
                "holding {} is attached to portfolio {}, not {}",
                holding.id, stored.portfolio_id, holding.portfolio_id
            ))
            .into());
        }
        if holding.is_closed() {
            holdings::Entity::delete_by_id(holding.id)
                .exec(self.db.as_ref())
                .await?;
        } else {
            holding_model(holding).update(self.db.as_ref()).await?;
        }
        Ok(())
    }

    async fn remove_holding(&self, id: HoldingId) -> Result<Holding> {
        let holding = self.load_holding(id).await?;
        holdings::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(holding)
    }

    async fn write_snapshot(&self, snapshot: &ValuationSnapshot) -> Result<i64> {
        let result = portfolios::Entity::update_many()
            .col_expr(portfolios::Column::TotalValue, Expr::value(snapshot.total_value))
            .col_expr(
                portfolios::Column::LastUpdated,
                Expr::value(snapshot.recorded_at),
            )
            .col_expr(
                portfolios::Column::Version,
                Expr::col(portfolios::Column::Version).add(1),
            )
            .filter(portfolios::Column::Id.eq(snapshot.portfolio_id))
            .filter(portfolios::Column::Version.eq(snapshot.expected_version))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            self.ensure_portfolio(snapshot.portfolio_id).await?;
            debug!(
                portfolio_id = snapshot.portfolio_id,
                expected_version = snapshot.expected_version,
                "snapshot lost the version race"
            );
            return Err(Error::SnapshotConflict(snapshot.portfolio_id));
        }
        Ok(snapshot.expected_version + 1)
    }
}

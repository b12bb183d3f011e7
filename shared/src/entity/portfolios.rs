//! `SeaORM` Entity, @generated manually

use fingenius_core::portfolio::{AllocationMap, Portfolio, PortfolioType};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub portfolio_type: String, // individual, joint, trust, retirement, ...
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub total_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub cash_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub invested_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub risk_score: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub sharpe_ratio: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub volatility: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub beta: Option<Decimal>,
    #[sea_orm(nullable)]
    pub asset_allocation: Option<Json>,
    #[sea_orm(nullable)]
    pub sector_allocation: Option<Json>,
    #[sea_orm(nullable)]
    pub geographic_allocation: Option<Json>,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))")]
    pub total_return: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub annualized_return: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub max_drawdown: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))", nullable)]
    pub ai_fit_score: Option<Decimal>,
    pub last_rebalancing_date: Option<DateTimeUtc>,
    pub next_rebalancing_date: Option<DateTimeUtc>,
    pub is_active: bool,
    pub is_public: bool,
    pub version: i64,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
    pub last_updated: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::holdings::Entity")]
    Holdings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::holdings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holdings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn allocation(raw: Option<&Json>) -> Result<Option<AllocationMap>, fingenius_core::Error> {
    match raw {
        None | Some(Json::Null) => Ok(None),
        Some(value) => AllocationMap::from_json(value).map(Some),
    }
}

impl TryFrom<Model> for Portfolio {
    type Error = fingenius_core::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let asset_allocation = allocation(m.asset_allocation.as_ref())?;
        let sector_allocation = allocation(m.sector_allocation.as_ref())?;
        let geographic_allocation = allocation(m.geographic_allocation.as_ref())?;

        Ok(Portfolio {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            description: m.description,
            portfolio_type: PortfolioType::from(m.portfolio_type),
            total_value: m.total_value,
            cash_balance: m.cash_balance,
            invested_amount: m.invested_amount,
            risk_score: m.risk_score,
            sharpe_ratio: m.sharpe_ratio,
            volatility: m.volatility,
            beta: m.beta,
            asset_allocation,
            sector_allocation,
            geographic_allocation,
            total_return: m.total_return,
            annualized_return: m.annualized_return,
            max_drawdown: m.max_drawdown,
            ai_fit_score: m.ai_fit_score,
            last_rebalancing_date: m.last_rebalancing_date,
            next_rebalancing_date: m.next_rebalancing_date,
            is_active: m.is_active,
            is_public: m.is_public,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
            last_updated: m.last_updated,
        })
    }
}

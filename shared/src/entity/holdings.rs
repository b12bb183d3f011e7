//! `SeaORM` Entity, @generated manually

use fingenius_core::portfolio::{Holding, SecurityType};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "holdings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub portfolio_id: i64,
    pub symbol: String,
    pub security_name: String,
    pub security_type: String, // stock, bond, etf, mutual_fund, ...
    #[sea_orm(nullable)]
    pub isin: Option<String>,
    #[sea_orm(nullable)]
    pub cusip: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub average_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))", nullable)]
    pub current_price: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))", nullable)]
    pub current_value: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub unrealized_gain_loss: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub unrealized_gain_loss_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))")]
    pub total_return: Decimal,
    #[sea_orm(nullable)]
    pub sector: Option<String>,
    #[sea_orm(nullable)]
    pub industry: Option<String>,
    #[sea_orm(nullable)]
    pub country: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::portfolios::Entity",
        from = "Column::PortfolioId",
        to = "super::portfolios::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Portfolios,
}

impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Holding {
    fn from(m: Model) -> Self {
        Holding {
            id: m.id,
            portfolio_id: m.portfolio_id,
            symbol: m.symbol,
            security_name: m.security_name,
            security_type: SecurityType::from(m.security_type),
            isin: m.isin,
            cusip: m.cusip,
            quantity: m.quantity,
            average_cost: m.average_cost,
            current_price: m.current_price,
            current_value: m.current_value,
            unrealized_gain_loss: m.unrealized_gain_loss,
            unrealized_gain_loss_percent: m.unrealized_gain_loss_percent,
            total_return: m.total_return,
            sector: m.sector,
            industry: m.industry,
            country: m.country,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Portfolios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Portfolios::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(Portfolios::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Portfolios::Name).string().not_null())
                    .col(ColumnDef::new(Portfolios::Description).text().null())
                    .col(ColumnDef::new(Portfolios::PortfolioType).string().not_null().default("individual"))
                    // last snapshot, rewritten only by snapshot writes
                    .col(ColumnDef::new(Portfolios::TotalValue).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Portfolios::CashBalance).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Portfolios::InvestedAmount).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Portfolios::RiskScore).decimal_len(10, 4).null()) // 1-10
                    .col(ColumnDef::new(Portfolios::SharpeRatio).decimal_len(10, 4).null())
                    .col(ColumnDef::new(Portfolios::Volatility).decimal_len(10, 4).null())
                    .col(ColumnDef::new(Portfolios::Beta).decimal_len(10, 4).null())
                    .col(ColumnDef::new(Portfolios::AssetAllocation).json_binary().null())
                    .col(ColumnDef::new(Portfolios::SectorAllocation).json_binary().null())
                    .col(ColumnDef::new(Portfolios::GeographicAllocation).json_binary().null())
                    .col(ColumnDef::new(Portfolios::TotalReturn).decimal_len(10, 4).not_null().default(0))
                    .col(ColumnDef::new(Portfolios::AnnualizedReturn).decimal_len(10, 4).null())
                    .col(ColumnDef::new(Portfolios::MaxDrawdown).decimal_len(10, 4).null())
                    .col(ColumnDef::new(Portfolios::AiFitScore).decimal_len(10, 4).null())
                    .col(ColumnDef::new(Portfolios::LastRebalancingDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Portfolios::NextRebalancingDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Portfolios::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Portfolios::IsPublic).boolean().not_null().default(false))
                    .col(ColumnDef::new(Portfolios::Version).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Portfolios::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Portfolios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Portfolios::LastUpdated).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolios_user")
                            .from(Portfolios::Table, Portfolios::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_user")
                    .table(Portfolios::Table)
                    .col(Portfolios::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Portfolios::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    UserId,
    Name,
    Description,
    PortfolioType,
    TotalValue,
    CashBalance,
    InvestedAmount,
    RiskScore,
    SharpeRatio,
    Volatility,
    Beta,
    AssetAllocation,
    SectorAllocation,
    GeographicAllocation,
    TotalReturn,
    AnnualizedReturn,
    MaxDrawdown,
    AiFitScore,
    LastRebalancingDate,
    NextRebalancingDate,
    IsActive,
    IsPublic,
    Version,
    CreatedAt,
    UpdatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Holdings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Holdings::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(Holdings::PortfolioId).big_integer().not_null())
                    .col(ColumnDef::new(Holdings::Symbol).string().not_null())
                    .col(ColumnDef::new(Holdings::SecurityName).string().not_null())
                    .col(ColumnDef::new(Holdings::SecurityType).string().not_null()) // stock, bond, etf, ...
                    .col(ColumnDef::new(Holdings::Isin).string().null())
                    .col(ColumnDef::new(Holdings::Cusip).string().null())
                    .col(ColumnDef::new(Holdings::Quantity).decimal_len(20, 8).not_null().default(0)) // negative for shorts
                    .col(ColumnDef::new(Holdings::AverageCost).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Holdings::CurrentPrice).decimal_len(20, 8).null()) // null when unpriced
                    .col(ColumnDef::new(Holdings::CurrentValue).decimal_len(20, 8).null())
                    .col(ColumnDef::new(Holdings::UnrealizedGainLoss).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Holdings::UnrealizedGainLossPercent).decimal().not_null().default(0)) // unbounded
                    .col(ColumnDef::new(Holdings::TotalReturn).decimal_len(10, 4).not_null().default(0))
                    .col(ColumnDef::new(Holdings::Sector).string().null())
                    .col(ColumnDef::new(Holdings::Industry).string().null())
                    .col(ColumnDef::new(Holdings::Country).string().null())
                    .col(
                        ColumnDef::new(Holdings::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Holdings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_holdings_portfolio")
                            .from(Holdings::Table, Holdings::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_holdings_portfolio")
                    .table(Holdings::Table)
                    .col(Holdings::PortfolioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_holdings_symbol")
                    .table(Holdings::Table)
                    .col(Holdings::Symbol)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Holdings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Holdings {
    Table,
    Id,
    PortfolioId,
    Symbol,
    SecurityName,
    SecurityType,
    Isin,
    Cusip,
    Quantity,
    AverageCost,
    CurrentPrice,
    CurrentValue,
    UnrealizedGainLoss,
    UnrealizedGainLossPercent,
    TotalReturn,
    Sector,
    Industry,
    Country,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
}

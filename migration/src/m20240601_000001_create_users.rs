use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().null().unique_key())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::HashedPassword).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::IsVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(ColumnDef::new(Users::Address).text().null())
                    .col(ColumnDef::new(Users::ProfilePictureUrl).string().null())
                    .col(ColumnDef::new(Users::RiskTolerance).string().null()) // conservative, moderate, aggressive
                    .col(ColumnDef::new(Users::InvestmentGoals).json_binary().null())
                    .col(ColumnDef::new(Users::AnnualIncome).big_integer().null())
                    .col(ColumnDef::new(Users::NetWorth).big_integer().null())
                    .col(ColumnDef::new(Users::KycStatus).string().not_null().default("pending"))
                    .col(ColumnDef::new(Users::KycDocuments).json_binary().null())
                    .col(ColumnDef::new(Users::AmlCheckStatus).string().not_null().default("pending"))
                    .col(
                        ColumnDef::new(Users::NotificationPreferences)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Users::PrivacySettings)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(ColumnDef::new(Users::ThemePreference).string().not_null().default("system"))
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    HashedPassword,
    IsActive,
    IsVerified,
    IsSuperuser,
    Phone,
    DateOfBirth,
    Address,
    ProfilePictureUrl,
    RiskTolerance,
    InvestmentGoals,
    AnnualIncome,
    NetWorth,
    KycStatus,
    KycDocuments,
    AmlCheckStatus,
    NotificationPreferences,
    PrivacySettings,
    ThemePreference,
    CreatedAt,
    UpdatedAt,
    LastLogin,
}

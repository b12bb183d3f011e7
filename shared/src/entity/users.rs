//! `SeaORM` Entity, @generated manually

use fingenius_core::identity::{KycStatus, RiskTolerance, ThemePreference, User};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique, nullable)]
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_superuser: bool,
    #[sea_orm(nullable)]
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    #[sea_orm(nullable)]
    pub profile_picture_url: Option<String>,
    #[sea_orm(nullable)]
    pub risk_tolerance: Option<String>, // conservative, moderate, aggressive
    #[sea_orm(nullable)]
    pub investment_goals: Option<Json>,
    #[sea_orm(nullable)]
    pub annual_income: Option<i64>,
    #[sea_orm(nullable)]
    pub net_worth: Option<i64>,
    pub kyc_status: String, // pending, approved, rejected
    #[sea_orm(nullable)]
    pub kyc_documents: Option<Json>,
    pub aml_check_status: String,
    pub notification_preferences: Json,
    pub privacy_settings: Json,
    pub theme_preference: String, // light, dark, system
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portfolios::Entity")]
    Portfolios,
}

impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = fingenius_core::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: m.id,
            email: m.email,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            hashed_password: m.hashed_password,
            is_active: m.is_active,
            is_verified: m.is_verified,
            is_superuser: m.is_superuser,
            phone: m.phone,
            date_of_birth: m.date_of_birth,
            address: m.address,
            profile_picture_url: m.profile_picture_url,
            risk_tolerance: m
                .risk_tolerance
                .as_deref()
                .map(str::parse::<RiskTolerance>)
                .transpose()?,
            investment_goals: m.investment_goals,
            annual_income: m.annual_income,
            net_worth: m.net_worth,
            kyc_status: m.kyc_status.parse::<KycStatus>()?,
            kyc_documents: m.kyc_documents,
            aml_check_status: m.aml_check_status.parse::<KycStatus>()?,
            notification_preferences: m.notification_preferences,
            privacy_settings: m.privacy_settings,
            theme_preference: m.theme_preference.parse::<ThemePreference>()?,
            created_at: m.created_at,
            updated_at: m.updated_at,
            last_login: m.last_login,
        })
    }
}

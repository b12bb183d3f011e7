use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fingenius_core::identity::{KycStatus, ThemePreference, User};
use fingenius_core::UserId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use serde_json::json;

use crate::entity::users;
use crate::error::Result;
use crate::store::{NewUser, UserStore};

pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: UserId) -> Result<users::Model> {
        users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| fingenius_core::Error::not_found("user", id).into())
    }
}

fn to_domain(model: Option<users::Model>) -> Result<Option<User>> {
    Ok(model.map(User::try_from).transpose()?)
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        to_domain(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        to_domain(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        to_domain(user)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User> {
        let now = Utc::now();
        let active_model = users::ActiveModel {
            email: ActiveValue::Set(new.email),
            username: ActiveValue::Set(new.username),
            first_name: ActiveValue::Set(new.first_name),
            last_name: ActiveValue::Set(new.last_name),
            hashed_password: ActiveValue::Set(new.hashed_password),
            is_active: ActiveValue::Set(true),
            is_verified: ActiveValue::Set(false),
            is_superuser: ActiveValue::Set(false),
            phone: ActiveValue::Set(None),
            date_of_birth: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            profile_picture_url: ActiveValue::Set(None),
            risk_tolerance: ActiveValue::Set(None),
            investment_goals: ActiveValue::Set(None),
            annual_income: ActiveValue::Set(None),
            net_worth: ActiveValue::Set(None),
            kyc_status: ActiveValue::Set(KycStatus::Pending.as_str().to_string()),
            kyc_documents: ActiveValue::Set(None),
            aml_check_status: ActiveValue::Set(KycStatus::Pending.as_str().to_string()),
            notification_preferences: ActiveValue::Set(json!({})),
            privacy_settings: ActiveValue::Set(json!({})),
            theme_preference: ActiveValue::Set(ThemePreference::System.as_str().to_string()),
            created_at: ActiveValue::Set(Some(now)),
            updated_at: ActiveValue::Set(Some(now)),
            last_login: ActiveValue::Set(None),
            ..Default::default()
        };

        let user = users::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(User::try_from(user)?)
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<()> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::LastLogin, Expr::value(at))
            .filter(users::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(fingenius_core::Error::not_found("user", id).into());
        }
        Ok(())
    }

    async fn set_user_active(&self, id: UserId, active: bool) -> Result<User> {
        let mut user = self.find_model(id).await?.into_active_model();
        user.is_active = ActiveValue::Set(active);
        user.updated_at = ActiveValue::Set(Some(Utc::now()));
        let user = user.update(self.db.as_ref()).await?;
        Ok(User::try_from(user)?)
    }
}

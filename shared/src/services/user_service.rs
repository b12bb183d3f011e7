use std::sync::Arc;

use chrono::Utc;
use fingenius_core::identity::User;
use fingenius_core::UserId;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::services::password::PasswordHasher;
use crate::store::{NewUser, UserStore};

const MIN_PASSWORD_LEN: usize = 8;

/// Registration input as submitted by a client
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(Error::Validation(format!("'{}' is not a valid email", email))),
    }
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Register a new active, unverified user
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let email = normalize_email(&registration.email);
        validate_email(&email)?;

        let username = registration
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let first_name = registration.first_name.trim().to_string();
        let last_name = registration.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::Validation("first and last name are required".to_string()));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(Error::Duplicate(format!("email {}", email)));
        }
        if let Some(username) = username.as_deref() {
            if self.store.find_user_by_username(username).await?.is_some() {
                return Err(Error::Duplicate(format!("username {}", username)));
            }
        }

        let hasher = self.hasher;
        let password = registration.password;
        let hashed_password = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::PasswordHash(e.to_string()))?;

        let user = self
            .store
            .insert_user(NewUser {
                email,
                username,
                first_name,
                last_name,
                hashed_password,
            })
            .await?;
        info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    /// Check credentials and stamp `last_login` on success
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let Some(mut user) = self.store.find_user_by_email(&email).await? else {
            return Err(Error::InvalidCredentials);
        };

        let hasher = self.hasher;
        let password = password.to_string();
        let stored = user.hashed_password.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| Error::PasswordHash(e.to_string()))??;
        if !matches {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(Error::InvalidCredentials);
        }
        if !user.is_active {
            return Err(Error::AccountDisabled);
        }

        let now = Utc::now();
        self.store.record_login(user.id, now).await?;
        user.last_login = Some(now);
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| fingenius_core::Error::not_found("user", id).into())
    }

    /// Soft-disable a user; the record is kept
    pub async fn deactivate(&self, id: UserId) -> Result<User> {
        let user = self.store.set_user_active(id, false).await?;
        info!(user_id = id, "Deactivated user");
        Ok(user)
    }
}

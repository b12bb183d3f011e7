use std::sync::Arc;

use fingenius_core::valuation::{CashPolicy, MarginAwareCashPolicy};
use sea_orm::DatabaseConnection;
use shared::repositories::{PortfolioRepository, UserRepository};
use shared::services::{PasswordHasher, PortfolioService, UserService, ValuationService};
use shared::store::{InMemoryStore, PortfolioStore, UserStore};
use shared::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<UserService>,
    pub portfolios: Arc<PortfolioService>,
    pub valuation: Arc<ValuationService>,
}

impl AppState {
    pub fn new(
        config: Config,
        portfolio_store: Arc<dyn PortfolioStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        let policy: Arc<dyn CashPolicy> = Arc::new(MarginAwareCashPolicy::new(config.cash_policy()));
        let hasher = PasswordHasher::new(config.password_hash_rounds);

        Self {
            users: Arc::new(UserService::new(user_store.clone(), hasher)),
            portfolios: Arc::new(PortfolioService::new(
                portfolio_store.clone(),
                user_store,
                policy.clone(),
            )),
            valuation: Arc::new(ValuationService::new(portfolio_store, policy)),
            config: Arc::new(config),
        }
    }

    /// State backed by the SeaORM repositories
    pub fn with_database(config: Config, db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self::new(
            config,
            Arc::new(PortfolioRepository::new(db.clone())),
            Arc::new(UserRepository::new(db)),
        )
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(config, store.clone(), store)
    }
}

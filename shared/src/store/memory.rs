//! In-memory store over a [`PortfolioBook`], used by tests and local runs
//! without a database.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fingenius_core::book::PortfolioBook;
use fingenius_core::identity::User;
use fingenius_core::portfolio::{Holding, Portfolio};
use fingenius_core::valuation::ValuationSnapshot;
use fingenius_core::{HoldingId, PortfolioId, UserId};
use tokio::sync::RwLock;

use super::{NewHolding, NewPortfolio, NewUser, PortfolioStore, UserStore};
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct InMemoryStore {
    book: RwLock<PortfolioBook>,
    next_user: AtomicI64,
    next_portfolio: AtomicI64,
    next_holding: AtomicI64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::from_book(PortfolioBook::new())
    }

    /// Seed the store with an existing book; new ids continue after the highest seeded id
    pub fn from_book(book: PortfolioBook) -> Self {
        let max_user = book.users().map(|u| u.id).max().unwrap_or(0);
        let max_portfolio = book.portfolios().map(|p| p.id).max().unwrap_or(0);
        let max_holding = book
            .portfolios()
            .filter_map(|p| book.holdings_of(p.id).ok())
            .flat_map(|list| list.iter().map(|h| h.id))
            .max()
            .unwrap_or(0);

        Self {
            book: RwLock::new(book),
            next_user: AtomicI64::new(max_user + 1),
            next_portfolio: AtomicI64::new(max_portfolio + 1),
            next_holding: AtomicI64::new(max_holding + 1),
        }
    }

    /// Copy of the current book
    pub async fn book(&self) -> PortfolioBook {
        self.book.read().await.clone()
    }
}

#[async_trait]
impl PortfolioStore for InMemoryStore {
    async fn load_portfolio(&self, id: PortfolioId) -> Result<Portfolio> {
        Ok(self.book.read().await.portfolio(id)?.clone())
    }

    async fn load_holdings(&self, portfolio_id: PortfolioId) -> Result<Vec<Holding>> {
        Ok(self.book.read().await.holdings_of(portfolio_id)?.to_vec())
    }

    async fn load_holding(&self, id: HoldingId) -> Result<Holding> {
        Ok(self.book.read().await.holding(id)?.clone())
    }

    async fn list_portfolios(&self, user_id: UserId) -> Result<Vec<Portfolio>> {
        let book = self.book.read().await;
        Ok(book.portfolios_of(user_id).into_iter().cloned().collect())
    }

    async fn active_portfolio_ids(&self) -> Result<Vec<PortfolioId>> {
        let book = self.book.read().await;
        Ok(book
            .portfolios()
            .filter(|p| p.is_active)
            .map(|p| p.id)
            .collect())
    }

    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio> {
        let mut book = self.book.write().await;
        book.user(new.user_id)?;
        let id = self.next_portfolio.fetch_add(1, Ordering::SeqCst);
        let portfolio = new.into_portfolio(id, Utc::now());
        book.insert_portfolio(portfolio.clone());
        Ok(portfolio)
    }

    async fn add_holding(&self, new: NewHolding) -> Result<Holding> {
        let mut book = self.book.write().await;
        book.portfolio(new.portfolio_id)?;
        let id = self.next_holding.fetch_add(1, Ordering::SeqCst);
        let holding = new.into_holding(id, Utc::now())?;
        book.insert_holding(holding.clone())?;
        Ok(holding)
    }

    async fn save_holding(&self, holding: &Holding) -> Result<()> {
        let mut book = self.book.write().await;
        book.holding(holding.id)?;
        book.insert_holding(holding.clone())?;
        if holding.is_closed() {
            book.prune_closed(holding.portfolio_id)?;
        }
        Ok(())
    }

    async fn remove_holding(&self, id: HoldingId) -> Result<Holding> {
        Ok(self.book.write().await.remove_holding(id)?)
    }

    async fn write_snapshot(&self, snapshot: &ValuationSnapshot) -> Result<i64> {
        let mut book = self.book.write().await;
        let portfolio = book.portfolio_mut(snapshot.portfolio_id)?;
        if !snapshot.is_current_for(portfolio) {
            return Err(Error::SnapshotConflict(snapshot.portfolio_id));
        }
        snapshot.apply_to(portfolio);
        Ok(portfolio.version)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.book.read().await.user(id).ok().cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let book = self.book.read().await;
        let found = book.users().find(|u| u.email == email).cloned();
        Ok(found)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let book = self.book.read().await;
        let found = book
            .users()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned();
        Ok(found)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User> {
        let mut book = self.book.write().await;
        if book.users().any(|u| u.email.eq_ignore_ascii_case(&new.email)) {
            return Err(Error::Duplicate(format!("email {}", new.email)));
        }
        if let Some(username) = new.username.as_deref() {
            if book.users().any(|u| u.username.as_deref() == Some(username)) {
                return Err(Error::Duplicate(format!("username {}", username)));
            }
        }

        let id = self.next_user.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut user = User::new(
            id,
            new.email,
            new.first_name,
            new.last_name,
            new.hashed_password,
        );
        user.username = new.username;
        user.created_at = Some(now);
        user.updated_at = Some(now);
        book.insert_user(user.clone())?;
        Ok(user)
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<()> {
        let mut book = self.book.write().await;
        let user = book.user_mut(id)?;
        user.last_login = Some(at);
        Ok(())
    }

    async fn set_user_active(&self, id: UserId, active: bool) -> Result<User> {
        let mut book = self.book.write().await;
        let user = book.user_mut(id)?;
        user.is_active = active;
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }
}

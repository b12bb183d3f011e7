//! Id-indexed arena of users, portfolios and holdings.
//!
//! Relationships are plain foreign-key fields (`Portfolio::user_id`,
//! `Holding::portfolio_id`) resolved through lookup tables here, so no record
//! holds a reference to another.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::identity::User;
use crate::portfolio::{Holding, Portfolio};
use crate::{HoldingId, PortfolioId, UserId};

#[derive(Debug, Clone, Default)]
pub struct PortfolioBook {
    users: BTreeMap<UserId, User>,
    portfolios: BTreeMap<PortfolioId, Portfolio>,
    /// Holdings per portfolio, kept ordered by holding id
    holdings: BTreeMap<PortfolioId, Vec<Holding>>,
    holding_index: HashMap<HoldingId, PortfolioId>,
}

impl PortfolioBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    ///
    /// Fails when another user already has the same email or username.
    pub fn insert_user(&mut self, user: User) -> Result<()> {
        let clash = self.users.values().find(|other| {
            other.id != user.id
                && (other.email.eq_ignore_ascii_case(&user.email)
                    || (user.username.is_some() && other.username == user.username))
        });
        if let Some(other) = clash {
            return Err(Error::Consistency(format!(
                "user {} shares email or username with user {}",
                user.id, other.id
            )));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    pub fn user(&self, id: UserId) -> Result<&User> {
        self.users.get(&id).ok_or(Error::not_found("user", id))
    }

    pub fn user_mut(&mut self, id: UserId) -> Result<&mut User> {
        self.users.get_mut(&id).ok_or(Error::not_found("user", id))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Insert or replace a portfolio. Its holdings are kept.
    pub fn insert_portfolio(&mut self, portfolio: Portfolio) {
        self.holdings.entry(portfolio.id).or_default();
        self.portfolios.insert(portfolio.id, portfolio);
    }

    pub fn portfolio(&self, id: PortfolioId) -> Result<&Portfolio> {
        self.portfolios.get(&id).ok_or(Error::not_found("portfolio", id))
    }

    pub fn portfolio_mut(&mut self, id: PortfolioId) -> Result<&mut Portfolio> {
        self.portfolios
            .get_mut(&id)
            .ok_or(Error::not_found("portfolio", id))
    }

    pub fn portfolios(&self) -> impl Iterator<Item = &Portfolio> {
        self.portfolios.values()
    }

    pub fn portfolios_of(&self, user_id: UserId) -> Vec<&Portfolio> {
        self.portfolios
            .values()
            .filter(|p| p.user_id == user_id)
            .collect()
    }

    /// The user a portfolio belongs to
    pub fn owner_of(&self, portfolio_id: PortfolioId) -> Result<&User> {
        let portfolio = self.portfolio(portfolio_id)?;
        self.user(portfolio.user_id)
    }

    /// Insert or replace a holding.
    ///
    /// The holding's portfolio must already be in the book, and an existing
    /// holding id may not move to a different portfolio.
    pub fn insert_holding(&mut self, holding: Holding) -> Result<()> {
        if !self.portfolios.contains_key(&holding.portfolio_id) {
            return Err(Error::Consistency(format!(
                "holding {} references unknown portfolio {}",
                holding.id, holding.portfolio_id
            )));
        }
        if let Some(&current) = self.holding_index.get(&holding.id) {
            if current != holding.portfolio_id {
                return Err(Error::Consistency(format!(
                    "holding {} is attached to portfolio {}, not {}",
                    holding.id, current, holding.portfolio_id
                )));
            }
        }

        let list = self.holdings.entry(holding.portfolio_id).or_default();
        self.holding_index.insert(holding.id, holding.portfolio_id);
        match list.binary_search_by_key(&holding.id, |h| h.id) {
            Ok(pos) => list[pos] = holding,
            Err(pos) => list.insert(pos, holding),
        }
        Ok(())
    }

    pub fn holding(&self, id: HoldingId) -> Result<&Holding> {
        let portfolio_id = self
            .holding_index
            .get(&id)
            .ok_or(Error::not_found("holding", id))?;
        self.holdings
            .get(portfolio_id)
            .and_then(|list| list.iter().find(|h| h.id == id))
            .ok_or(Error::not_found("holding", id))
    }

    /// Holdings of a portfolio, ordered by id. Empty is valid.
    pub fn holdings_of(&self, portfolio_id: PortfolioId) -> Result<&[Holding]> {
        self.portfolio(portfolio_id)?;
        Ok(self
            .holdings
            .get(&portfolio_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    pub fn remove_holding(&mut self, id: HoldingId) -> Result<Holding> {
        let portfolio_id = self
            .holding_index
            .remove(&id)
            .ok_or(Error::not_found("holding", id))?;
        let list = self
            .holdings
            .get_mut(&portfolio_id)
            .ok_or(Error::not_found("holding", id))?;
        let pos = list
            .iter()
            .position(|h| h.id == id)
            .ok_or(Error::not_found("holding", id))?;
        Ok(list.remove(pos))
    }

    /// Drop every zero-quantity holding of a portfolio, returning what was removed
    pub fn prune_closed(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Holding>> {
        self.portfolio(portfolio_id)?;
        let list = self.holdings.entry(portfolio_id).or_default();
        let (closed, open): (Vec<Holding>, Vec<Holding>) =
            list.drain(..).partition(Holding::is_closed);
        *list = open;
        for holding in &closed {
            self.holding_index.remove(&holding.id);
        }
        Ok(closed)
    }
}

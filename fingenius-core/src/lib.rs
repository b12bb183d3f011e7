//! FinGenius core: the identity record and the portfolio valuation model.
//!
//! This crate is pure and synchronous. It never touches a database or the
//! network; callers load a [`Portfolio`](portfolio::Portfolio) and its
//! [`Holding`](portfolio::Holding)s from wherever they live and ask the
//! [`valuation`] functions for consistent derived figures.
//!
//! # Features
//!
//! - **Identity**: user record, risk tolerance, KYC/AML status
//! - **Portfolio**: portfolio and holding records, allocation maps
//! - **Valuation**: market value, cost basis, unrealized gain/loss, totals,
//!   allocation percentages and breakdowns, all in `Decimal`
//! - **Policy**: injectable cash-balance rules
//! - **Book**: id-indexed arena of users, portfolios and holdings
//! - **Summary**: the serialized field contract exposed to API clients
//!
//! # Example
//!
//! ```
//! use fingenius_core::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut portfolio = Portfolio::new(1, 7, "Retirement");
//! portfolio.cash_balance = Decimal::from(5000);
//!
//! let mut holding = Holding::new(10, 1, "AAPL", "Apple Inc.", SecurityType::Stock);
//! holding.quantity = Decimal::from(10);
//! holding.average_cost = Decimal::from(100);
//! holding.current_price = Some(Decimal::from(150));
//!
//! let policy = MarginAwareCashPolicy::default();
//! let total = total_portfolio_value(&portfolio, &[holding], &policy).unwrap();
//! assert_eq!(total, Decimal::from(6500));
//! ```

pub mod book;
pub mod error;
pub mod identity;
pub mod portfolio;
pub mod summary;
pub mod valuation;

pub use error::{Error, Result};

/// Identifier of a [`identity::User`].
pub type UserId = i64;
/// Identifier of a [`portfolio::Portfolio`].
pub type PortfolioId = i64;
/// Identifier of a [`portfolio::Holding`].
pub type HoldingId = i64;

// Re-export commonly used types
pub mod prelude {
    pub use crate::book::*;
    pub use crate::error::*;
    pub use crate::identity::*;
    pub use crate::portfolio::*;
    pub use crate::summary::*;
    pub use crate::valuation::*;
    pub use crate::{HoldingId, PortfolioId, UserId};
}

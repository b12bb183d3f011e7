pub mod password;
pub mod portfolio_service;
pub mod user_service;
pub mod valuation_service;

pub use password::PasswordHasher;
pub use portfolio_service::PortfolioService;
pub use user_service::{Registration, UserService};
pub use valuation_service::{SnapshotReport, ValuationService};

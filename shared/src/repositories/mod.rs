pub mod portfolio_repository;
pub mod user_repository;

pub use portfolio_repository::PortfolioRepository;
pub use user_repository::UserRepository;

pub mod holdings;
pub mod portfolios;
pub mod users;

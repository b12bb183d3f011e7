pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod logging;
pub mod repositories;
pub mod services;
pub mod store;

pub use config::Config;
pub use database::get_db_connection;
pub use error::{Error, Result};
pub use logging::init_tracing;

//! Account and identity record

pub mod user;

pub use user::*;

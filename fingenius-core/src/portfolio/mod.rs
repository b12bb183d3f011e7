//! Portfolio records: portfolios, holdings and allocation maps

pub mod allocation;
pub mod holding;
pub mod record;

pub use allocation::*;
pub use holding::*;
pub use record::*;

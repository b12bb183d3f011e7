//! Valuation module

pub mod breakdown;
pub mod calculator;
pub mod policy;
pub mod snapshot;

pub use breakdown::*;
pub use calculator::*;
pub use policy::*;
pub use snapshot::*;

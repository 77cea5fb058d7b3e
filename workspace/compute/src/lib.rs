//! Pure computation for the rent ledger: period-label parsing and
//! ordering, the line-item calculator with its override inference, the
//! per-entry editing session, and the trend/breakdown aggregation built
//! on top of them. Nothing in this crate performs I/O; every operation
//! is synchronous arithmetic over values the caller already holds.

pub mod error;
pub mod ledger;
pub mod period;
pub mod trends;

pub use error::{ComputeError, Result};
pub use ledger::session::{EditSession, SessionOrigin};

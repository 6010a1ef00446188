//! Closed-form fixed income calculations: bond present value, Macaulay and
//! modified duration, analytical and approximate convexity, and
//! duration/convexity price-change estimates.
//!
//! Every function is pure. Inputs are validated here and violations come back
//! as [`BondCalcError`]; re-prompting is left to the caller.

pub mod error;
pub mod pricing;
pub mod types;

#[cfg(feature = "duration")]
pub mod duration;

#[cfg(feature = "convexity")]
pub mod convexity;

#[cfg(feature = "price_change")]
pub mod price_change;

#[cfg(all(feature = "duration", feature = "convexity"))]
pub mod risk;

pub use error::BondCalcError;
pub use pricing::schedule::{BondSpec, CashflowSchedule, ScheduledCashflow, YieldAssumption};
pub use types::*;

/// Standard result type for all bond-calc operations
pub type BondCalcResult<T> = Result<T, BondCalcError>;

//! Daily and aggregate EUR→USD metrics.
//!
//! Pure functions over a `RateSeries`. Zero denominators yield `None`
//! instead of an error.

pub mod metrics;
pub mod report;
pub mod rounding;

pub use metrics::{daily_breakdown, pct_change, summarize};
pub use report::{Breakdown, SummaryReport};
pub use rounding::{round_pct, round_rate, round_to};

//! Frankfurter API client with TTL caching and a static fallback dataset.
//!
//! `RateClient` resolves a date range by trying, in order, the in-memory
//! cache, the live API, and the bundled (or configured) fallback dataset.

pub mod cache;
pub mod client;
pub mod clock;
pub mod fallback;
pub mod payload;
pub mod source;

pub use cache::{CacheEntry, CacheKey, RateCache, TtlCache};
pub use client::RateClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use fallback::FallbackStore;
pub use payload::{RateValue, RatesPayload};
pub use source::{FetchFailure, FrankfurterSource, RateSource};

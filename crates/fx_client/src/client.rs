//! Rate resolution: cache, then live API, then fallback dataset.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use common::{AppConfig, Error, LatestRate, RateSeries, BASE_CURRENCY, SYMBOL_CURRENCY};
use tracing::{info, warn};

use crate::cache::{CacheKey, RateCache, TtlCache};
use crate::clock::{Clock, SystemClock};
use crate::fallback::FallbackStore;
use crate::source::{FetchFailure, FrankfurterSource, RateSource};

/// EUR→USD rate client. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct RateClient {
    source: Arc<dyn RateSource>,
    cache: Arc<dyn RateCache>,
    clock: Arc<dyn Clock>,
    fallback: Arc<FallbackStore>,
}

impl RateClient {
    pub fn new(
        source: Arc<dyn RateSource>,
        cache: Arc<dyn RateCache>,
        clock: Arc<dyn Clock>,
        fallback: FallbackStore,
    ) -> Self {
        Self {
            source,
            cache,
            clock,
            fallback: Arc::new(fallback),
        }
    }

    /// Production wiring: Frankfurter source, TTL cache, wall clock.
    pub fn from_config(config: &AppConfig, fallback: FallbackStore) -> Self {
        let source = FrankfurterSource::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        );
        Self::new(
            Arc::new(source),
            Arc::new(TtlCache::with_ttl_secs(config.cache_ttl_secs)),
            Arc::new(SystemClock),
            fallback,
        )
    }

    pub fn cache(&self) -> &Arc<dyn RateCache> {
        &self.cache
    }

    /// Rates for `[start, end]` inclusive.
    ///
    /// Upstream failures are logged and answered from the fallback dataset;
    /// only an empty fallback surfaces as `NoDataAvailable`.
    pub async fn get_rates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<RateSeries>, Error> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        let key = CacheKey::Range {
            base: BASE_CURRENCY,
            symbol: SYMBOL_CURRENCY,
            start,
            end,
        };

        if let Some(cached) = self.cache.get(&key, self.clock.now()) {
            return Ok(cached);
        }

        match self.fetch_live(start, end).await {
            Ok(series) => {
                let series = Arc::new(series);
                self.cache.put(key, series.clone(), self.clock.now());
                Ok(series)
            }
            Err(failure) => {
                warn!("Live fetch failed for {}..{}: {}", start, end, failure);
                self.fallback_range(start, end)
            }
        }
    }

    /// The most recently published rate.
    ///
    /// Falls back to the last day of the fallback dataset.
    pub async fn get_latest(&self) -> Result<LatestRate, Error> {
        let key = CacheKey::Latest {
            base: BASE_CURRENCY,
            symbol: SYMBOL_CURRENCY,
        };

        if let Some(latest) = self
            .cache
            .get(&key, self.clock.now())
            .and_then(|cached| cached.last().copied())
        {
            return Ok(LatestRate {
                date: latest.date,
                rate: latest.rate,
            });
        }

        let fetched = self.source.fetch_latest().await.and_then(|payload| {
            payload
                .to_latest(SYMBOL_CURRENCY)
                .ok_or_else(|| FetchFailure::Empty("latest".into()))
        });

        match fetched {
            Ok(latest) => {
                let series = RateSeries::from_pairs([(latest.date, latest.rate)]);
                self.cache.put(key, Arc::new(series), self.clock.now());
                Ok(latest)
            }
            Err(failure) => {
                warn!("Live fetch failed for latest rate: {}", failure);
                let latest = self
                    .fallback
                    .latest()
                    .ok_or_else(|| Error::NoDataAvailable("latest rate".into()))?;
                info!("Serving latest rate for {} from fallback data", latest.date);
                Ok(latest)
            }
        }
    }

    async fn fetch_live(&self, start: NaiveDate, end: NaiveDate) -> Result<RateSeries, FetchFailure> {
        let payload = self.source.fetch_range(start, end).await?;

        // Frankfurter rolls a weekend start back to the previous business day.
        let series = payload.to_series(SYMBOL_CURRENCY).within(start, end);
        if series.is_empty() {
            return Err(FetchFailure::Empty(format!("{start}..{end}")));
        }

        info!("Fetched {} days of rates for {}..{}", series.len(), start, end);
        Ok(series)
    }

    /// Fallback results are not cached so the next call retries the API.
    fn fallback_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Arc<RateSeries>, Error> {
        let series = self.fallback.range(start, end);
        if series.is_empty() {
            return Err(Error::NoDataAvailable(format!("{start}..{end}")));
        }

        info!(
            "Serving {} days for {}..{} from fallback data",
            series.len(),
            start,
            end
        );
        Ok(Arc::new(series))
    }
}

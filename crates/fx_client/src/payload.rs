//! Wire format of the Frankfurter API (also used for the fallback file).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{LatestRate, RateSeries};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Response from `/{start}..{end}` and `/latest`.
///
/// For a range, `rates` is keyed by date and each value by symbol. For
/// `/latest`, `rates` is keyed by symbol and the day is in `date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub rates: BTreeMap<String, RateValue>,
}

/// A rate entry is either keyed by symbol or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    Direct(f64),
    BySymbol(BTreeMap<String, f64>),
}

fn usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

impl RatesPayload {
    /// Convert a date-keyed payload into a `RateSeries` for `symbol`.
    ///
    /// Unparseable dates, days without `symbol`, and non-positive rates are
    /// skipped.
    pub fn to_series(&self, symbol: &str) -> RateSeries {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for (raw_date, value) in &self.rates {
            let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") else {
                warn!("Skipping rate with unparseable date {:?}", raw_date);
                continue;
            };

            let rate = match value {
                RateValue::Direct(r) => Some(*r),
                RateValue::BySymbol(m) => m.get(symbol).copied(),
            };

            match rate {
                Some(r) if usable(r) => {
                    by_date.insert(date, r);
                }
                Some(r) => warn!("Skipping invalid {} rate {} for {}", symbol, r, date),
                None => warn!("No {} rate found for {}", symbol, date),
            }
        }

        RateSeries::from_map(by_date)
    }

    /// Read a `/latest` payload.
    pub fn to_latest(&self, symbol: &str) -> Option<LatestRate> {
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        match self.rates.get(symbol)? {
            RateValue::Direct(r) if usable(*r) => Some(LatestRate { date, rate: *r }),
            _ => None,
        }
    }
}

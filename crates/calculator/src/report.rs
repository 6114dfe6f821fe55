//! Response document combining daily and aggregate metrics.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use common::{DailyResult, Error, RateSeries, SummaryResult, BASE_CURRENCY, SYMBOL_CURRENCY};
use serde::{Deserialize, Serialize};

use crate::metrics::{daily_breakdown, summarize};

/// Whether a report carries per-day rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakdown {
    #[default]
    Day,
    None,
}

impl FromStr for Breakdown {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "day" => Ok(Breakdown::Day),
            "none" => Ok(Breakdown::None),
            other => Err(Error::InvalidBreakdown(other.to_string())),
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breakdown::Day => f.write_str("day"),
            Breakdown::None => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub base: String,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub breakdown: Breakdown,
    pub totals: SummaryResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyResult>>,
}

impl SummaryReport {
    /// Fails with `EmptySeries` when there is nothing to summarize.
    pub fn build(
        series: &RateSeries,
        breakdown: Breakdown,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> common::Result<Self> {
        let totals = summarize(series)?;
        let daily = match breakdown {
            Breakdown::Day => Some(daily_breakdown(series)),
            Breakdown::None => None,
        };

        Ok(Self {
            base: BASE_CURRENCY.to_string(),
            symbol: SYMBOL_CURRENCY.to_string(),
            start_date,
            end_date,
            breakdown,
            totals,
            daily,
        })
    }
}

//! Multi-currency cost aggregation.
//!
//! Every positive cost is converted into the trip's base currency and summed.
//! The breakdown keeps per-currency subtotals in both the original currency
//! and the base currency. No rounding happens here.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::activity::{Activity, TransportSegment};
use crate::types::CurrencyCode;

/// Rates expressed as "1 unit of this currency = N units of base currency".
pub type ExchangeRates = HashMap<CurrencyCode, f64>;

/// Subtotal for one original currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTotal {
    /// Sum in the original currency.
    pub total: f64,
    /// The same sum converted into the base currency.
    pub converted_total: f64,
}

/// Aggregated cost of a set of activities and transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayCost {
    /// Grand total in the base currency.
    pub total: f64,
    /// Per original currency. Only currencies with a positive contribution appear.
    pub breakdown: BTreeMap<CurrencyCode, CurrencyTotal>,
}

impl DayCost {
    fn add(
        &mut self,
        amount: f64,
        currency: &CurrencyCode,
        rates: &ExchangeRates,
        base: &CurrencyCode,
    ) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        let rate = conversion_rate(currency, rates, base);
        let converted = amount * rate;
        let entry = self.breakdown.entry(currency.clone()).or_default();
        entry.total += amount;
        entry.converted_total += converted;
        self.total += converted;
    }
}

/// Rate for converting `currency` into `base`.
///
/// The base currency is always 1, and so is any currency without a configured rate.
pub fn conversion_rate(currency: &CurrencyCode, rates: &ExchangeRates, base: &CurrencyCode) -> f64 {
    if currency == base {
        return 1.0;
    }
    rates.get(currency).copied().unwrap_or(1.0)
}

/// The amount an activity contributes: actual cost wins over the estimate,
/// even when the actual cost is zero.
fn activity_amount(activity: &Activity) -> f64 {
    activity
        .actual_cost
        .or(activity.estimated_cost)
        .unwrap_or(0.0)
}

/// Sums activity costs and selected transport costs into `base`.
///
/// Unselected transport alternatives are ignored. Items without a currency
/// are taken to be in the base currency.
pub fn calculate_day_cost(
    activities: &[Activity],
    segments: &[TransportSegment],
    rates: &ExchangeRates,
    base: &CurrencyCode,
) -> DayCost {
    let mut cost = DayCost::default();

    for activity in activities {
        let currency = activity.currency.as_ref().unwrap_or(base);
        cost.add(activity_amount(activity), currency, rates, base);
    }

    for segment in segments.iter().filter(|s| s.is_selected) {
        let currency = segment.currency.as_ref().unwrap_or(base);
        cost.add(segment.cost.unwrap_or(0.0), currency, rates, base);
    }

    cost
}

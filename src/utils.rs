use crate::error::{AnalyticsError, Result};
use chrono::{Days, NaiveDate};

/// Percentage ratio with a guarded denominator: returns 0.0 instead of
/// NaN/Infinity when `denominator` is zero.
pub fn ratio_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

/// Every calendar day in the inclusive [start, end] range, in order.
/// Empty when start > end.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AnalyticsError::DateError(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            raw
        ))
    })
}

pub fn validate_tax_rate(ads_tax_rate: f64) -> Result<()> {
    if !ads_tax_rate.is_finite() || ads_tax_rate < 0.0 {
        return Err(AnalyticsError::InvalidTaxRate(ads_tax_rate));
    }
    Ok(())
}

/// Chart axis label for a daily bucket, e.g. "Mar 05".
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

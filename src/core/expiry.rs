use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};

pub const DAYS_PER_YEAR: f64 = 365.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Adds whole years to `issue_date`, keeping month and day. Feb 29 becomes
/// Feb 28 when the target year is not a leap year. Saturates at
/// `NaiveDate::MAX` for periods beyond the representable range.
pub fn expiry_date(issue_date: NaiveDate, validity_period_years: u32) -> NaiveDate {
    validity_period_years
        .checked_mul(12)
        .and_then(|months| issue_date.checked_add_months(Months::new(months)))
        .unwrap_or(NaiveDate::MAX)
}

/// Fractional days from `now` until midnight UTC at the start of `expiry`.
/// Negative once the expiry instant has passed.
fn days_until(expiry: NaiveDate, now: DateTime<Utc>) -> f64 {
    let expiry_instant = expiry.and_time(NaiveTime::MIN).and_utc();
    (expiry_instant - now).num_seconds() as f64 / SECONDS_PER_DAY
}

/// `(expiry - now)` in days over a fixed 365-day year, never below zero.
/// Full precision is kept; use [`display_years`] for presentation.
pub fn years_remaining(expiry: NaiveDate, now: DateTime<Utc>) -> f64 {
    (days_until(expiry, now) / DAYS_PER_YEAR).max(0.0)
}

/// Whole days until expiry, rounded up. Negative for expired licenses.
pub fn days_remaining(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    days_until(expiry, now).ceil() as i64
}

/// One decimal place, e.g. `13.2`.
pub fn display_years(years: f64) -> String {
    format!("{:.1}", years)
}

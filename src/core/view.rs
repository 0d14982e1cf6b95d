use crate::core::expiry::{days_remaining, display_years, expiry_date, years_remaining};
use crate::core::status::classify;
use crate::domain::model::{LicenseRecord, LicenseStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// A license with every time-derived field computed against one `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseView {
    #[serde(flatten)]
    pub license: LicenseRecord,
    pub expiry_date: NaiveDate,
    /// Unrounded; drives `status`.
    pub years_remaining: f64,
    pub years_remaining_display: String,
    pub days_remaining: i64,
    pub status: LicenseStatus,
    pub application_fee_display: String,
    pub license_fee_display: String,
}

impl LicenseView {
    pub fn derive(license: LicenseRecord, now: DateTime<Utc>, currency_symbol: &str) -> Self {
        let expiry = expiry_date(license.issue_date, license.validity_period_years);
        let years = years_remaining(expiry, now);

        Self {
            expiry_date: expiry,
            years_remaining: years,
            years_remaining_display: display_years(years),
            days_remaining: days_remaining(expiry, now),
            status: classify(years),
            application_fee_display: format_currency(license.application_fee_paid, currency_symbol),
            license_fee_display: format_currency(license.license_fee_paid, currency_symbol),
            license,
        }
    }

    pub fn expires_within_days(&self, days: i64) -> bool {
        (0..=days).contains(&self.days_remaining)
    }
}

pub fn derive_all(
    licenses: Vec<LicenseRecord>,
    now: DateTime<Utc>,
    currency_symbol: &str,
) -> Vec<LicenseView> {
    licenses
        .into_iter()
        .map(|license| LicenseView::derive(license, now, currency_symbol))
        .collect()
}

/// en-US style amount: thousands separators, up to two decimals, no
/// trailing zeros (`$100,000,000`, `$800.5`, `$12.05`).
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = match fraction {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{:02}", f),
    };

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}{}", sign, symbol, grouped, fraction)
}

use crate::core::view::{format_currency, LicenseView};
use crate::domain::model::{LicenseStatus, LicenseType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline figures for the regulator overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_companies: usize,
    pub total_licenses: usize,
    pub licenses_by_type: BTreeMap<LicenseType, usize>,
    pub active: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub expiry_window_days: i64,
    pub expiring_within_window: usize,
    pub total_fees_collected: f64,
    pub total_fees_collected_display: String,
}

impl DashboardSummary {
    pub fn build(
        total_companies: usize,
        views: &[LicenseView],
        expiry_window_days: i64,
        currency_symbol: &str,
    ) -> Self {
        let mut licenses_by_type: BTreeMap<LicenseType, usize> =
            LicenseType::ALL.iter().map(|t| (*t, 0)).collect();
        let (mut active, mut expiring_soon, mut expired) = (0, 0, 0);
        let mut total_fees = 0.0;
        let mut within_window = 0;

        for view in views {
            *licenses_by_type.entry(view.license.license_type).or_default() += 1;
            match view.status {
                LicenseStatus::Active => active += 1,
                LicenseStatus::ExpiringSoon => expiring_soon += 1,
                LicenseStatus::Expired => expired += 1,
            }
            if view.expires_within_days(expiry_window_days) {
                within_window += 1;
            }
            total_fees += view.license.application_fee_paid + view.license.license_fee_paid;
        }

        Self {
            total_companies,
            total_licenses: views.len(),
            licenses_by_type,
            active,
            expiring_soon,
            expired,
            expiry_window_days,
            expiring_within_window: within_window,
            total_fees_collected: total_fees,
            total_fees_collected_display: format_currency(total_fees, currency_symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GpsCoordinates, LicenseRecord};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn view(license_type: LicenseType, issue: (i32, u32, u32), years: u32) -> LicenseView {
        let record = LicenseRecord {
            id: format!("lic-{}-{}", issue.0, years),
            company_name: "Mobile Connect".to_string(),
            license_type,
            issue_date: NaiveDate::from_ymd_opt(issue.0, issue.1, issue.2).unwrap(),
            validity_period_years: years,
            application_fee_paid: 350.0,
            license_fee_paid: 2_000_000.0,
            email: "hello@mobileconnect.co.zw".to_string(),
            gps_coordinates: GpsCoordinates {
                lat: -20.15,
                lng: 28.58,
            },
        };
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        LicenseView::derive(record, now, "$")
    }

    #[test]
    fn test_summary_counts() {
        let views = vec![
            view(LicenseType::Ctl, (2023, 1, 15), 15),
            view(LicenseType::Ctl, (2010, 11, 30), 15),
            view(LicenseType::Prsl, (2015, 6, 20), 10),
        ];
        let summary = DashboardSummary::build(2, &views, 90, "$");

        assert_eq!(summary.total_companies, 2);
        assert_eq!(summary.total_licenses, 3);
        assert_eq!(summary.licenses_by_type[&LicenseType::Ctl], 2);
        assert_eq!(summary.licenses_by_type[&LicenseType::Prsl], 1);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.expiring_soon, 1);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.expiring_within_window, 1);
        assert_eq!(summary.total_fees_collected_display, "$6,001,050");
    }

    #[test]
    fn test_empty_summary_lists_every_type() {
        let summary = DashboardSummary::build(0, &[], 90, "$");
        assert_eq!(summary.licenses_by_type.len(), 2);
        assert_eq!(summary.total_fees_collected_display, "$0");
    }
}

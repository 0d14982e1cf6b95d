use crate::core::view::LicenseView;
use crate::core::Storage;
use crate::utils::error::{LedgerError, Result};
use serde::Serialize;

pub const LICENSE_EXPORT_FILE: &str = "licenses.csv";

#[derive(Debug, Serialize)]
struct LicenseRow<'a> {
    id: &'a str,
    company: &'a str,
    license_type: &'a str,
    issue_date: String,
    expiry_date: String,
    years_remaining: &'a str,
    days_remaining: i64,
    status: &'a str,
    application_fee: &'a str,
    license_fee: &'a str,
    email: &'a str,
    latitude: f64,
    longitude: f64,
}

impl<'a> From<&'a LicenseView> for LicenseRow<'a> {
    fn from(view: &'a LicenseView) -> Self {
        Self {
            id: &view.license.id,
            company: &view.license.company_name,
            license_type: view.license.license_type.code(),
            issue_date: view.license.issue_date.to_string(),
            expiry_date: view.expiry_date.to_string(),
            years_remaining: &view.years_remaining_display,
            days_remaining: view.days_remaining,
            status: view.status.label(),
            application_fee: &view.application_fee_display,
            license_fee: &view.license_fee_display,
            email: &view.license.email,
            latitude: view.license.gps_coordinates.lat,
            longitude: view.license.gps_coordinates.lng,
        }
    }
}

/// Renders views as CSV with a header row, in the given order.
pub fn licenses_to_csv(views: &[LicenseView]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for view in views {
        writer.serialize(LicenseRow::from(view))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| LedgerError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| LedgerError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Writes the CSV export to `storage` and returns the file name used.
pub async fn export_licenses<S: Storage>(storage: &S, views: &[LicenseView]) -> Result<String> {
    let csv = licenses_to_csv(views)?;
    tracing::debug!("Writing {} license rows ({} bytes)", views.len(), csv.len());
    storage
        .write_file(LICENSE_EXPORT_FILE, csv.as_bytes())
        .await?;
    Ok(LICENSE_EXPORT_FILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GpsCoordinates, LicenseRecord, LicenseType};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_csv_has_header_and_quoted_amounts() {
        let record = LicenseRecord {
            id: "lic-000001".to_string(),
            company_name: "TeleCom Solutions Ltd".to_string(),
            license_type: LicenseType::Ctl,
            issue_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            validity_period_years: 15,
            application_fee_paid: 800.0,
            license_fee_paid: 100_000_000.0,
            email: "info@telecom.co.zw".to_string(),
            gps_coordinates: GpsCoordinates {
                lat: -17.8252,
                lng: 31.0335,
            },
        };
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let view = LicenseView::derive(record, now, "$");

        let csv = licenses_to_csv(&[view]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,company,license_type,issue_date,expiry_date,years_remaining,days_remaining,status,application_fee,license_fee,email,latitude,longitude"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("lic-000001,TeleCom Solutions Ltd,CTL,2023-01-15,2038-01-15,13.0,"));
        assert!(row.contains("\"$100,000,000\""));
    }

    #[test]
    fn test_empty_export_is_empty() {
        assert_eq!(licenses_to_csv(&[]).unwrap(), "");
    }
}

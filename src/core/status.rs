use crate::domain::model::LicenseStatus;

/// Maps years remaining onto a lifecycle state. Recomputed on every read.
pub fn classify(years_remaining: f64) -> LicenseStatus {
    if years_remaining <= 0.0 {
        LicenseStatus::Expired
    } else if years_remaining < 1.0 {
        LicenseStatus::ExpiringSoon
    } else {
        LicenseStatus::Active
    }
}

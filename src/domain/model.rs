use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two license classes issued by the regulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LicenseType {
    /// Carrier & Telecommunications License
    Ctl,
    /// Public Radio Station License
    Prsl,
}

impl LicenseType {
    pub const ALL: [LicenseType; 2] = [LicenseType::Ctl, LicenseType::Prsl];

    pub fn code(&self) -> &'static str {
        match self {
            LicenseType::Ctl => "CTL",
            LicenseType::Prsl => "PRSL",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            LicenseType::Ctl => "Carrier & Telecommunications License",
            LicenseType::Prsl => "Public Radio Station License",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLicenseType(pub String);

impl fmt::Display for UnknownLicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown license type '{}', expected CTL or PRSL", self.0)
    }
}

impl std::error::Error for UnknownLicenseType {}

impl FromStr for LicenseType {
    type Err = UnknownLicenseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CTL" => Ok(LicenseType::Ctl),
            "PRSL" => Ok(LicenseType::Prsl),
            _ => Err(UnknownLicenseType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_person: String,
    pub address: String,
    pub gps_coordinates: GpsCoordinates,
}

impl CompanyRecord {
    pub fn from_new(id: String, company: NewCompany) -> Self {
        Self {
            id,
            name: company.name,
            email: company.email,
            contact_person: company.contact_person,
            address: company.address,
            gps_coordinates: company.gps_coordinates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub id: String,
    pub company_name: String,
    pub license_type: LicenseType,
    pub issue_date: NaiveDate,
    pub validity_period_years: u32,
    pub application_fee_paid: f64,
    pub license_fee_paid: f64,
    pub email: String,
    pub gps_coordinates: GpsCoordinates,
}

impl LicenseRecord {
    pub fn from_new(id: String, license: NewLicense) -> Self {
        Self {
            id,
            company_name: license.company_name,
            license_type: license.license_type,
            issue_date: license.issue_date,
            validity_period_years: license.validity_period_years,
            application_fee_paid: license.application_fee_paid,
            license_fee_paid: license.license_fee_paid,
            email: license.email,
            gps_coordinates: license.gps_coordinates,
        }
    }
}

/// Raw company intake, before validation and id assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    pub email: String,
    pub contact_person: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw license intake. License type and issue date stay textual until validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDraft {
    pub company_name: String,
    pub license_type: String,
    pub email: String,
    pub issue_date: String,
    pub validity_period_years: i64,
    pub application_fee_paid: f64,
    pub license_fee_paid: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// A validated company, ready to hand to a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    pub email: String,
    pub contact_person: String,
    pub address: String,
    pub gps_coordinates: GpsCoordinates,
}

/// A validated license, ready to hand to a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLicense {
    pub company_name: String,
    pub license_type: LicenseType,
    pub issue_date: NaiveDate,
    pub validity_period_years: u32,
    pub application_fee_paid: f64,
    pub license_fee_paid: f64,
    pub email: String,
    pub gps_coordinates: GpsCoordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub license_type: LicenseType,
    pub application_fee: f64,
    pub license_fee: f64,
    pub effective_date: NaiveDate,
}

/// Raw fee adjustment as submitted by an operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeUpdateRequest {
    pub license_type: String,
    pub application_fee: f64,
    pub license_fee: f64,
    pub effective_date: String,
    #[serde(default)]
    pub change_reason: Option<String>,
    #[serde(default)]
    pub approved_by: Option<String>,
}

/// Validated fee adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeUpdate {
    pub schedule: FeeSchedule,
    pub change_reason: Option<String>,
    pub approved_by: Option<String>,
}

/// One entry of the append-only fee history. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeChangeRecord {
    license_type: LicenseType,
    previous_app_fee: f64,
    new_app_fee: f64,
    previous_license_fee: f64,
    new_license_fee: f64,
    change_date: NaiveDate,
    change_reason: Option<String>,
    approved_by: Option<String>,
}

impl FeeChangeRecord {
    /// `previous` is `None` when no schedule was in force, which is recorded as zero fees.
    pub fn new(
        previous: Option<&FeeSchedule>,
        update: &FeeUpdate,
        change_date: NaiveDate,
    ) -> Self {
        Self {
            license_type: update.schedule.license_type,
            previous_app_fee: previous.map(|s| s.application_fee).unwrap_or(0.0),
            new_app_fee: update.schedule.application_fee,
            previous_license_fee: previous.map(|s| s.license_fee).unwrap_or(0.0),
            new_license_fee: update.schedule.license_fee,
            change_date,
            change_reason: update.change_reason.clone(),
            approved_by: update.approved_by.clone(),
        }
    }

    pub fn license_type(&self) -> LicenseType {
        self.license_type
    }

    pub fn previous_app_fee(&self) -> f64 {
        self.previous_app_fee
    }

    pub fn new_app_fee(&self) -> f64 {
        self.new_app_fee
    }

    pub fn previous_license_fee(&self) -> f64 {
        self.previous_license_fee
    }

    pub fn new_license_fee(&self) -> f64 {
        self.new_license_fee
    }

    pub fn change_date(&self) -> NaiveDate {
        self.change_date
    }

    pub fn change_reason(&self) -> Option<&str> {
        self.change_reason.as_deref()
    }

    pub fn approved_by(&self) -> Option<&str> {
        self.approved_by.as_deref()
    }
}

/// Lifecycle state derived from years remaining; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseStatus {
    Active,
    ExpiringSoon,
    Expired,
}

impl LicenseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LicenseStatus::Active => "Active",
            LicenseStatus::ExpiringSoon => "Expiring Soon",
            LicenseStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Repository-side filter for license listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseFilter {
    pub license_type: Option<LicenseType>,
    pub company_name: Option<String>,
}

impl LicenseFilter {
    pub fn by_type(license_type: LicenseType) -> Self {
        Self {
            license_type: Some(license_type),
            company_name: None,
        }
    }

    pub fn by_company_name(name: impl Into<String>) -> Self {
        Self {
            license_type: None,
            company_name: Some(name.into()),
        }
    }

    pub fn accepts(&self, license: &LicenseRecord) -> bool {
        let type_ok = self
            .license_type
            .map(|t| t == license.license_type)
            .unwrap_or(true);
        let name_ok = self
            .company_name
            .as_deref()
            .map(|needle| contains_ignore_case(&license.company_name, needle))
            .unwrap_or(true);
        type_ok && name_ok
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_type_parses_case_insensitively() {
        assert_eq!(" ctl ".parse::<LicenseType>().unwrap(), LicenseType::Ctl);
        assert_eq!("PRSL".parse::<LicenseType>().unwrap(), LicenseType::Prsl);
        assert!("GSM".parse::<LicenseType>().is_err());
    }

    #[test]
    fn license_type_serializes_as_code() {
        let json = serde_json::to_string(&LicenseType::Prsl).unwrap();
        assert_eq!(json, "\"PRSL\"");
    }

    #[test]
    fn filter_matches_type_and_name() {
        let license = LicenseRecord {
            id: "lic-1".to_string(),
            company_name: "Radio Wave Broadcasting".to_string(),
            license_type: LicenseType::Prsl,
            issue_date: NaiveDate::from_ymd_opt(2019, 6, 20).unwrap(),
            validity_period_years: 10,
            application_fee_paid: 350.0,
            license_fee_paid: 2_000_000.0,
            email: "ops@radiowave.co.zw".to_string(),
            gps_coordinates: GpsCoordinates {
                lat: -17.8252,
                lng: 31.0335,
            },
        };

        assert!(LicenseFilter::default().accepts(&license));
        assert!(LicenseFilter::by_type(LicenseType::Prsl).accepts(&license));
        assert!(!LicenseFilter::by_type(LicenseType::Ctl).accepts(&license));
        assert!(LicenseFilter::by_company_name("wave").accepts(&license));
        assert!(!LicenseFilter::by_company_name("telecom").accepts(&license));
    }
}

use crate::domain::model::{
    CompanyDraft, FeeSchedule, FeeUpdate, FeeUpdateRequest, GpsCoordinates, LicenseDraft,
    LicenseType, NewCompany, NewLicense,
};
use crate::utils::error::{LedgerError, Result, ValidationErrors};
use crate::utils::validation::{
    check_date, check_email, check_min_length, check_non_negative, check_range,
};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_CONTACT_PERSON_LENGTH: usize = 2;
pub const MIN_ADDRESS_LENGTH: usize = 5;
pub const MAX_VALIDITY_PERIOD_YEARS: u32 = 1000;

const LATITUDE_MESSAGE: &str = "Latitude must be between -90 and 90";
const LONGITUDE_MESSAGE: &str = "Longitude must be between -180 and 180";

fn check_coordinates(errors: &mut ValidationErrors, latitude: f64, longitude: f64) {
    check_range(errors, "latitude", latitude, -90.0, 90.0, LATITUDE_MESSAGE);
    check_range(errors, "longitude", longitude, -180.0, 180.0, LONGITUDE_MESSAGE);
}

fn check_license_type(errors: &mut ValidationErrors, raw: &str) -> Option<LicenseType> {
    match raw.parse::<LicenseType>() {
        Ok(license_type) => Some(license_type),
        Err(_) => {
            errors.push("license_type", "License type must be one of CTL or PRSL");
            None
        }
    }
}

/// Checks every company field and returns the trimmed record.
pub fn validate_company(draft: &CompanyDraft) -> Result<NewCompany> {
    let mut errors = ValidationErrors::new();

    check_min_length(
        &mut errors,
        "name",
        &draft.name,
        MIN_NAME_LENGTH,
        "Company name must be at least 2 characters",
    );
    check_email(&mut errors, "email", &draft.email);
    check_min_length(
        &mut errors,
        "contact_person",
        &draft.contact_person,
        MIN_CONTACT_PERSON_LENGTH,
        "Contact person must be at least 2 characters",
    );
    check_min_length(
        &mut errors,
        "address",
        &draft.address,
        MIN_ADDRESS_LENGTH,
        "Address must be at least 5 characters",
    );
    check_coordinates(&mut errors, draft.latitude, draft.longitude);

    errors.into_result()?;

    Ok(NewCompany {
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        contact_person: draft.contact_person.trim().to_string(),
        address: draft.address.trim().to_string(),
        gps_coordinates: GpsCoordinates {
            lat: draft.latitude,
            lng: draft.longitude,
        },
    })
}

/// Checks every license field and returns the typed record.
pub fn validate_license(draft: &LicenseDraft) -> Result<NewLicense> {
    let mut errors = ValidationErrors::new();

    check_min_length(
        &mut errors,
        "company_name",
        &draft.company_name,
        MIN_NAME_LENGTH,
        "Company name must be at least 2 characters",
    );
    let license_type = check_license_type(&mut errors, &draft.license_type);
    check_email(&mut errors, "email", &draft.email);
    let issue_date = check_date(
        &mut errors,
        "issue_date",
        &draft.issue_date,
        "Issue date is required",
    );

    let validity = u32::try_from(draft.validity_period_years)
        .ok()
        .filter(|years| *years > 0);
    let validity = match validity {
        None => {
            errors.push(
                "validity_period_years",
                "Validity period must be a positive number of years",
            );
            None
        }
        Some(years) if years > MAX_VALIDITY_PERIOD_YEARS => {
            errors.push(
                "validity_period_years",
                format!("Validity period must be at most {} years", MAX_VALIDITY_PERIOD_YEARS),
            );
            None
        }
        valid => valid,
    };

    check_non_negative(
        &mut errors,
        "application_fee_paid",
        draft.application_fee_paid,
        "Application fee must be zero or a positive number",
    );
    check_non_negative(
        &mut errors,
        "license_fee_paid",
        draft.license_fee_paid,
        "License fee must be zero or a positive number",
    );
    check_coordinates(&mut errors, draft.latitude, draft.longitude);

    match (license_type, issue_date, validity) {
        (Some(license_type), Some(issue_date), Some(validity_period_years))
            if errors.is_empty() =>
        {
            Ok(NewLicense {
                company_name: draft.company_name.trim().to_string(),
                license_type,
                issue_date,
                validity_period_years,
                application_fee_paid: draft.application_fee_paid,
                license_fee_paid: draft.license_fee_paid,
                email: draft.email.trim().to_string(),
                gps_coordinates: GpsCoordinates {
                    lat: draft.latitude,
                    lng: draft.longitude,
                },
            })
        }
        _ => Err(LedgerError::Validation(errors)),
    }
}

/// Checks a fee adjustment; blank reason/approver are treated as absent.
pub fn validate_fee_update(request: &FeeUpdateRequest) -> Result<FeeUpdate> {
    let mut errors = ValidationErrors::new();

    let license_type = check_license_type(&mut errors, &request.license_type);
    check_non_negative(
        &mut errors,
        "application_fee",
        request.application_fee,
        "Application fee must be zero or a positive number",
    );
    check_non_negative(
        &mut errors,
        "license_fee",
        request.license_fee,
        "License fee must be zero or a positive number",
    );
    let effective_date = check_date(
        &mut errors,
        "effective_date",
        &request.effective_date,
        "Effective date is required",
    );

    match (license_type, effective_date) {
        (Some(license_type), Some(effective_date)) if errors.is_empty() => Ok(FeeUpdate {
            schedule: FeeSchedule {
                license_type,
                application_fee: request.application_fee,
                license_fee: request.license_fee,
                effective_date,
            },
            change_reason: non_blank(request.change_reason.as_deref()),
            approved_by: non_blank(request.approved_by.as_deref()),
        }),
        _ => Err(LedgerError::Validation(errors)),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

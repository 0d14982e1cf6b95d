use crate::utils::error::{LedgerError, Result, ValidationErrors};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // local@domain.tld, no whitespace, exactly one '@'
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Records `message` unless `value` (trimmed) has at least `min` characters.
pub fn check_min_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.trim().chars().count() < min {
        errors.push(field, message);
    }
}

pub fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !is_valid_email(value.trim()) {
        errors.push(field, "Invalid email address");
    }
}

/// Records `message` for NaN/infinite values or values outside `[min, max]`.
pub fn check_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
    message: &str,
) {
    if !value.is_finite() || value < min || value > max {
        errors.push(field, message);
    }
}

pub fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: f64, message: &str) {
    if !value.is_finite() || value < 0.0 {
        errors.push(field, message);
    }
}

/// Parses a `YYYY-MM-DD` date, recording `required_message` when blank and a
/// format message when unparsable.
pub fn check_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    required_message: &str,
) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, required_message);
        return None;
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, format!("{} must be a date in YYYY-MM-DD format", label(field)));
            None
        }
    }
}

fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(LedgerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LedgerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: i64, min_value: i64) -> Result<()> {
    if value < min_value {
        return Err(LedgerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("info@telecom.co.zw"));
        assert!(is_valid_email("a.b+c@example.com"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_check_range_rejects_nan() {
        let mut errors = ValidationErrors::new();
        check_range(&mut errors, "latitude", f64::NAN, -90.0, 90.0, "bad");
        check_range(&mut errors, "longitude", 31.0335, -180.0, 180.0, "bad");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "latitude");
    }

    #[test]
    fn test_check_min_length_trims() {
        let mut errors = ValidationErrors::new();
        check_min_length(&mut errors, "name", "  A ", 2, "too short");
        check_min_length(&mut errors, "address", "12 Samora Machel Ave", 5, "too short");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_check_date() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            check_date(&mut errors, "issue_date", "2023-01-15", "Issue date is required"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        assert!(check_date(&mut errors, "issue_date", " ", "Issue date is required").is_none());
        assert!(check_date(&mut errors, "effective_date", "15/01/2023", "required").is_none());

        let messages: Vec<&str> = errors.messages().collect();
        assert_eq!(
            messages,
            vec![
                "Issue date is required",
                "Effective date must be a date in YYYY-MM-DD format"
            ]
        );
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data.snapshot_path", "./data/snapshot.json").is_ok());
        assert!(validate_path("data.snapshot_path", "").is_err());
        assert!(validate_path("data.snapshot_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("dashboard.expiry_window_days", 90, 1).is_ok());
        assert!(validate_positive_number("dashboard.expiry_window_days", 0, 1).is_err());
    }
}

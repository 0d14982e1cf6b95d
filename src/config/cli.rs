use crate::domain::model::LicenseType;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "license-ledger")]
#[command(about = "License expiry, status and fee schedule rules for CTL and PRSL licenses")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "ledger.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Evaluate expiry and status as of this date (YYYY-MM-DD) instead of now
    #[arg(long, value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List licenses with expiry date, years remaining and status
    Licenses {
        /// Free-text search over company, type and status
        #[arg(short, long, default_value = "")]
        query: String,
        /// Only licenses of this type (CTL or PRSL)
        #[arg(long = "type", value_parser = parse_license_type)]
        license_type: Option<LicenseType>,
        /// Only licenses whose company name contains this text
        #[arg(long)]
        company: Option<String>,
    },
    /// Show one license and its days remaining
    License { id: String },
    /// List registered companies
    Companies {
        /// Free-text search over name, contact person and email
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show the fee schedules in force and the fee change history
    Fees {
        #[arg(long = "type", value_parser = parse_license_type)]
        license_type: Option<LicenseType>,
    },
    /// Record a new fee schedule for a license type
    AdjustFees {
        #[arg(long = "type")]
        license_type: String,
        #[arg(long)]
        application_fee: f64,
        #[arg(long)]
        license_fee: f64,
        /// Date the new fees take effect (YYYY-MM-DD)
        #[arg(long)]
        effective_date: String,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        approved_by: Option<String>,
        /// Write the updated snapshot back to the data file
        #[arg(long)]
        save: bool,
    },
    /// Summary counts and fees collected
    Dashboard,
    /// Write license views as CSV into the output directory
    Export,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn parse_license_type(raw: &str) -> Result<LicenseType, String> {
    raw.parse::<LicenseType>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_licenses_command() {
        let cli = CliConfig::parse_from([
            "license-ledger",
            "--as-of",
            "2025-08-12",
            "licenses",
            "--type",
            "prsl",
            "-q",
            "radio",
        ]);
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2025, 8, 12));
        match cli.command {
            Command::Licenses {
                query,
                license_type,
                company,
            } => {
                assert_eq!(query, "radio");
                assert_eq!(license_type, Some(LicenseType::Prsl));
                assert!(company.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_adjust_fees() {
        let cli = CliConfig::parse_from([
            "license-ledger",
            "-c",
            "demos/ledger.toml",
            "adjust-fees",
            "--type",
            "CTL",
            "--application-fee",
            "800",
            "--license-fee",
            "100000000",
            "--effective-date",
            "2025-08-01",
            "--reason",
            "Annual tariff review",
            "--save",
        ]);
        assert_eq!(cli.config, "demos/ledger.toml");
        match cli.command {
            Command::AdjustFees {
                license_type,
                application_fee,
                reason,
                approved_by,
                save,
                ..
            } => {
                assert_eq!(license_type, "CTL");
                assert_eq!(application_fee, 800.0);
                assert_eq!(reason.as_deref(), Some("Annual tariff review"));
                assert!(approved_by.is_none());
                assert!(save);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_dates_and_types() {
        let bad_date = ["license-ledger", "--as-of", "12/08/2025", "dashboard"];
        assert!(CliConfig::try_parse_from(bad_date).is_err());

        let bad_type = ["license-ledger", "licenses", "--type", "GSM"];
        assert!(CliConfig::try_parse_from(bad_type).is_err());
    }
}

use clap::Parser;
use license_ledger::adapters::export::export_licenses;
use license_ledger::adapters::memory::Snapshot;
use license_ledger::config::Command;
use license_ledger::core::view::format_currency;
use license_ledger::core::{Clock, FixedClock, LicenseFilter, Storage, SystemClock};
use license_ledger::domain::model::FeeUpdateRequest;
use license_ledger::utils::error::ErrorSeverity;
use license_ledger::utils::{logger, validation::Validate};
use license_ledger::{
    CliConfig, FeeChangeRecorder, InMemoryStore, LedgerError, LicenseRegistry, LicenseView,
    LocalStorage, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig, config: TomlConfig) -> Result<(), LedgerError> {
    let files = LocalStorage::new(".");
    let snapshot = Snapshot::from_json_slice(&files.read_file(config.snapshot_path()).await?)?;
    tracing::info!(
        "📁 Loaded {} companies and {} licenses from {}",
        snapshot.companies.len(),
        snapshot.licenses.len(),
        config.snapshot_path()
    );

    let clock: Arc<dyn Clock> = match cli.as_of {
        Some(date) => {
            tracing::info!("🕒 Evaluating as of {}", date);
            Arc::new(FixedClock::at_date(date))
        }
        None => Arc::new(SystemClock),
    };

    let store = InMemoryStore::from_snapshot(snapshot);
    let registry = LicenseRegistry::new(store.clone(), store.clone(), clock.clone())
        .with_currency_symbol(config.currency_symbol());
    let recorder = FeeChangeRecorder::new(store.clone(), store.clone(), clock.clone());
    let symbol = config.currency_symbol();

    match cli.command {
        Command::Licenses {
            query,
            license_type,
            company,
        } => {
            let filter = LicenseFilter {
                license_type,
                company_name: company,
            };
            let views = registry.licenses(&filter, &query).await?;
            if views.is_empty() {
                println!("No licenses found");
            }
            for view in &views {
                print_license_row(view);
            }
        }
        Command::License { id } => {
            let view = registry.license(&id).await?;
            print_license_row(&view);
            println!(
                "{} license expires in {} days ({} years). Expiry date: {}",
                view.license.company_name,
                view.days_remaining,
                view.years_remaining_display,
                view.expiry_date
            );
        }
        Command::Companies { query } => {
            let companies = registry.companies(None, &query).await?;
            if companies.is_empty() {
                println!("No companies found");
            }
            for company in companies {
                println!(
                    "{:<12} {:<32} {:<20} {:<28} ({:.4}, {:.4})",
                    company.id,
                    company.name,
                    company.contact_person,
                    company.email,
                    company.gps_coordinates.lat,
                    company.gps_coordinates.lng
                );
            }
        }
        Command::Fees { license_type } => {
            for schedule in recorder.current_schedules().await? {
                println!(
                    "{:<5} {:<40} application {:>14}  license {:>16}  since {}",
                    schedule.license_type.code(),
                    schedule.license_type.full_name(),
                    format_currency(schedule.application_fee, symbol),
                    format_currency(schedule.license_fee, symbol),
                    schedule.effective_date
                );
            }
            println!();
            for change in recorder.history(license_type).await? {
                println!(
                    "{} {:<5} app {} -> {} ({})  license {} -> {} ({})  {}  [{}]",
                    change.change_date(),
                    change.license_type().code(),
                    format_currency(change.previous_app_fee(), symbol),
                    format_currency(change.new_app_fee(), symbol),
                    change.app_fee_delta_pct(),
                    format_currency(change.previous_license_fee(), symbol),
                    format_currency(change.new_license_fee(), symbol),
                    change.license_fee_delta_pct(),
                    change.change_reason().unwrap_or("-"),
                    change.approved_by().unwrap_or("-")
                );
            }
        }
        Command::AdjustFees {
            license_type,
            application_fee,
            license_fee,
            effective_date,
            reason,
            approved_by,
            save,
        } => {
            let request = FeeUpdateRequest {
                license_type,
                application_fee,
                license_fee,
                effective_date,
                change_reason: reason,
                approved_by,
            };
            let record = recorder.record_change(&request).await?;
            println!(
                "✅ Fees adjusted for {}: application {} ({}), license {} ({})",
                record.license_type(),
                format_currency(record.new_app_fee(), symbol),
                record.app_fee_delta_pct(),
                format_currency(record.new_license_fee(), symbol),
                record.license_fee_delta_pct()
            );

            if save {
                let json = store.snapshot().await.to_json_pretty()?;
                files
                    .write_file(config.snapshot_path(), json.as_bytes())
                    .await?;
                tracing::info!("💾 Snapshot written to {}", config.snapshot_path());
            }
        }
        Command::Dashboard => {
            let summary = registry.dashboard(config.expiry_window_days()).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Export => {
            let views = registry.licenses(&LicenseFilter::default(), "").await?;
            let output = LocalStorage::new(config.output_path());
            let file = export_licenses(&output, &views).await?;
            tracing::info!("✅ Exported {} licenses", views.len());
            println!("📁 Output saved to: {}", output.base_path().join(file).display());
        }
    }

    Ok(())
}

fn print_license_row(view: &LicenseView) {
    println!(
        "{:<12} {:<32} {:<5} issued {}  expires {}  {:>5}y  {:<13} {:>14} {:>16}",
        view.license.id,
        view.license.company_name,
        view.license.license_type.code(),
        view.license.issue_date,
        view.expiry_date,
        view.years_remaining_display,
        view.status.label(),
        view.application_fee_display,
        view.license_fee_display
    );
}

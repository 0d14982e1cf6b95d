use crate::core::validator::validate_fee_update;
use crate::domain::model::{FeeChangeRecord, FeeSchedule, FeeUpdateRequest, LicenseType};
use crate::domain::ports::{Clock, FeeHistoryLog, FeeScheduleRepository};
use crate::utils::error::Result;
use std::cmp::Reverse;
use std::fmt;

/// Percentage change between two fee amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeeDelta {
    /// Rounded to two decimal places.
    Percent(f64),
    /// The previous amount was zero, so no percentage exists.
    NoPriorValue,
}

impl FeeDelta {
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            FeeDelta::Percent(pct) => Some(*pct),
            FeeDelta::NoPriorValue => None,
        }
    }
}

impl fmt::Display for FeeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeDelta::Percent(pct) => write!(f, "{:+.2}%", pct),
            FeeDelta::NoPriorValue => f.write_str("n/a (no prior value)"),
        }
    }
}

/// `((new - old) / old) * 100`, rounded to two decimals.
pub fn delta_pct(old: f64, new: f64) -> FeeDelta {
    if old == 0.0 {
        return FeeDelta::NoPriorValue;
    }
    let pct = (new - old) / old * 100.0;
    FeeDelta::Percent((pct * 100.0).round() / 100.0)
}

impl FeeChangeRecord {
    pub fn app_fee_delta_pct(&self) -> FeeDelta {
        delta_pct(self.previous_app_fee(), self.new_app_fee())
    }

    pub fn license_fee_delta_pct(&self) -> FeeDelta {
        delta_pct(self.previous_license_fee(), self.new_license_fee())
    }
}

/// Applies fee schedule changes and keeps the history log in step.
pub struct FeeChangeRecorder<S, H, C> {
    schedules: S,
    history: H,
    clock: C,
}

impl<S, H, C> FeeChangeRecorder<S, H, C>
where
    S: FeeScheduleRepository,
    H: FeeHistoryLog,
    C: Clock,
{
    pub fn new(schedules: S, history: H, clock: C) -> Self {
        Self {
            schedules,
            history,
            clock,
        }
    }

    /// Validates the request, compares it with the schedule in force on its
    /// effective date, appends the history entry and then activates it.
    /// Fees already paid on existing licenses are untouched.
    pub async fn record_change(&self, request: &FeeUpdateRequest) -> Result<FeeChangeRecord> {
        let update = validate_fee_update(request)?;
        let license_type = update.schedule.license_type;

        let previous = self
            .schedules
            .active(license_type, update.schedule.effective_date)
            .await?;
        if previous.is_none() {
            tracing::debug!("No fee schedule in force for {}, deltas undefined", license_type);
        }

        let record = FeeChangeRecord::new(previous.as_ref(), &update, self.clock.today());

        // A schedule only goes live once its change is in the log.
        self.history.append(record.clone()).await?;
        self.schedules.activate(update.schedule.clone()).await?;

        tracing::info!(
            "Fee schedule for {} effective {}: application {}, license {}",
            license_type,
            update.schedule.effective_date,
            record.app_fee_delta_pct(),
            record.license_fee_delta_pct()
        );

        Ok(record)
    }

    /// The schedule in force today for `license_type`.
    pub async fn active_schedule(&self, license_type: LicenseType) -> Result<Option<FeeSchedule>> {
        self.schedules.active(license_type, self.clock.today()).await
    }

    /// One entry per license type that has a schedule in force today.
    pub async fn current_schedules(&self) -> Result<Vec<FeeSchedule>> {
        let mut current = Vec::new();
        for license_type in LicenseType::ALL {
            if let Some(schedule) = self.active_schedule(license_type).await? {
                current.push(schedule);
            }
        }
        Ok(current)
    }

    /// History newest first by change date. Entries sharing a date are
    /// listed most recently appended first.
    pub async fn history(&self, license_type: Option<LicenseType>) -> Result<Vec<FeeChangeRecord>> {
        let entries = self.history.entries(license_type).await?;
        let mut indexed: Vec<_> = entries.into_iter().enumerate().collect();
        indexed.sort_by_key(|(seq, record)| Reverse((record.change_date(), *seq)));
        Ok(indexed.into_iter().map(|(_, record)| record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::ports::FixedClock;
    use crate::utils::error::LedgerError;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct RejectingLog;

    #[async_trait]
    impl FeeHistoryLog for RejectingLog {
        async fn append(&self, _record: FeeChangeRecord) -> Result<()> {
            Err(LedgerError::upstream(
                "append fee history",
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "log closed"),
            ))
        }

        async fn entries(
            &self,
            _license_type: Option<LicenseType>,
        ) -> Result<Vec<FeeChangeRecord>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_append_leaves_schedules_unchanged() {
        let store = InMemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let recorder =
            FeeChangeRecorder::new(store.clone(), RejectingLog, FixedClock::at_date(today));

        let request = FeeUpdateRequest {
            license_type: "CTL".to_string(),
            application_fee: 800.0,
            license_fee: 1.0,
            effective_date: "2025-01-01".to_string(),
            ..Default::default()
        };
        let err = recorder.record_change(&request).await.unwrap_err();

        assert!(matches!(err, LedgerError::Upstream { .. }));
        assert!(store.all().await.unwrap().is_empty());
        assert!(recorder.active_schedule(LicenseType::Ctl).await.unwrap().is_none());
    }

    #[test]
    fn test_delta_pct_examples() {
        assert_eq!(delta_pct(750.0, 800.0), FeeDelta::Percent(6.67));
        assert_eq!(delta_pct(95_000_000.0, 100_000_000.0), FeeDelta::Percent(5.26));
        assert_eq!(delta_pct(300.0, 350.0), FeeDelta::Percent(16.67));
        assert_eq!(delta_pct(800.0, 600.0), FeeDelta::Percent(-25.0));
        assert_eq!(delta_pct(500.0, 500.0), FeeDelta::Percent(0.0));
    }

    #[test]
    fn test_delta_from_zero_is_undefined() {
        let delta = delta_pct(0.0, 800.0);
        assert_eq!(delta, FeeDelta::NoPriorValue);
        assert_eq!(delta.as_percent(), None);
        assert_eq!(delta.to_string(), "n/a (no prior value)");
    }

    #[test]
    fn test_delta_display() {
        assert_eq!(delta_pct(750.0, 800.0).to_string(), "+6.67%");
        assert_eq!(delta_pct(800.0, 600.0).to_string(), "-25.00%");
    }
}

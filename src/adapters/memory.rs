use crate::domain::model::{
    contains_ignore_case, CompanyRecord, FeeChangeRecord, FeeSchedule, LicenseFilter,
    LicenseRecord, LicenseType, NewCompany, NewLicense,
};
use crate::domain::ports::{
    CompanyRepository, FeeHistoryLog, FeeScheduleRepository, LicenseRepository,
};
use crate::utils::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Serializable contents of an [`InMemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
    #[serde(default)]
    pub licenses: Vec<LicenseRecord>,
    #[serde(default)]
    pub fee_schedules: Vec<FeeSchedule>,
    #[serde(default)]
    pub fee_history: Vec<FeeChangeRecord>,
}

impl Snapshot {
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Default)]
struct Tables {
    companies: RwLock<Vec<CompanyRecord>>,
    licenses: RwLock<Vec<LicenseRecord>>,
    schedules: RwLock<Vec<FeeSchedule>>,
    history: RwLock<Vec<FeeChangeRecord>>,
    sequence: AtomicU64,
    unavailable: AtomicBool,
}

/// Process-local implementation of every repository port. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let tables = Tables {
            companies: RwLock::new(snapshot.companies),
            licenses: RwLock::new(snapshot.licenses),
            schedules: RwLock::new(snapshot.fee_schedules),
            history: RwLock::new(snapshot.fee_history),
            sequence: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
        };
        Self {
            tables: Arc::new(tables),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            companies: self.tables.companies.read().await.clone(),
            licenses: self.tables.licenses.read().await.clone(),
            fee_schedules: self.tables.schedules.read().await.clone(),
            fee_history: self.tables.history.read().await.clone(),
        }
    }

    /// Makes every subsequent call fail with an upstream error, for
    /// exercising outage handling.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.tables.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self, operation: &str) -> Result<()> {
        if self.tables.unavailable.load(Ordering::SeqCst) {
            tracing::debug!("In-memory store refusing '{}'", operation);
            return Err(LedgerError::upstream(
                operation,
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "record store unavailable",
                ),
            ));
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let n = self.tables.sequence.fetch_add(1, Ordering::Relaxed) + 1;
            let id = format!("{}-{:06}", prefix, n);
            if !taken(&id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn list(&self, name: Option<&str>) -> Result<Vec<CompanyRecord>> {
        self.ensure_available("list companies")?;
        let companies = self.tables.companies.read().await;
        Ok(companies
            .iter()
            .filter(|c| name.map(|n| contains_ignore_case(&c.name, n)).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<CompanyRecord>> {
        self.ensure_available("get company")?;
        let companies = self.tables.companies.read().await;
        Ok(companies.iter().find(|c| c.id == id).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        self.ensure_available("check company name")?;
        let companies = self.tables.companies.read().await;
        Ok(companies.iter().any(|c| c.name == name))
    }

    async fn create(&self, company: NewCompany) -> Result<CompanyRecord> {
        self.ensure_available("create company")?;
        let mut companies = self.tables.companies.write().await;
        let id = self.next_id("cmp", |id| companies.iter().any(|c| c.id == id));
        let record = CompanyRecord::from_new(id, company);
        companies.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, company: NewCompany) -> Result<Option<CompanyRecord>> {
        self.ensure_available("update company")?;
        let mut companies = self.tables.companies.write().await;
        Ok(companies.iter_mut().find(|c| c.id == id).map(|slot| {
            *slot = CompanyRecord::from_new(id.to_string(), company);
            slot.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.ensure_available("delete company")?;
        let mut companies = self.tables.companies.write().await;
        let before = companies.len();
        companies.retain(|c| c.id != id);
        Ok(companies.len() != before)
    }
}

#[async_trait]
impl LicenseRepository for InMemoryStore {
    async fn list(&self, filter: &LicenseFilter) -> Result<Vec<LicenseRecord>> {
        self.ensure_available("list licenses")?;
        let licenses = self.tables.licenses.read().await;
        Ok(licenses.iter().filter(|l| filter.accepts(l)).cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<LicenseRecord>> {
        self.ensure_available("get license")?;
        let licenses = self.tables.licenses.read().await;
        Ok(licenses.iter().find(|l| l.id == id).cloned())
    }

    async fn create(&self, license: NewLicense) -> Result<LicenseRecord> {
        self.ensure_available("create license")?;
        let mut licenses = self.tables.licenses.write().await;
        let id = self.next_id("lic", |id| licenses.iter().any(|l| l.id == id));
        let record = LicenseRecord::from_new(id, license);
        licenses.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, license: NewLicense) -> Result<Option<LicenseRecord>> {
        self.ensure_available("update license")?;
        let mut licenses = self.tables.licenses.write().await;
        Ok(licenses.iter_mut().find(|l| l.id == id).map(|slot| {
            *slot = LicenseRecord::from_new(id.to_string(), license);
            slot.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.ensure_available("delete license")?;
        let mut licenses = self.tables.licenses.write().await;
        let before = licenses.len();
        licenses.retain(|l| l.id != id);
        Ok(licenses.len() != before)
    }
}

#[async_trait]
impl FeeScheduleRepository for InMemoryStore {
    async fn active(
        &self,
        license_type: LicenseType,
        as_of: NaiveDate,
    ) -> Result<Option<FeeSchedule>> {
        self.ensure_available("read fee schedule")?;
        let schedules = self.tables.schedules.read().await;
        Ok(schedules
            .iter()
            .filter(|s| s.license_type == license_type && s.effective_date <= as_of)
            .max_by_key(|s| s.effective_date)
            .cloned())
    }

    async fn activate(&self, schedule: FeeSchedule) -> Result<()> {
        self.ensure_available("activate fee schedule")?;
        let mut schedules = self.tables.schedules.write().await;
        schedules.retain(|s| {
            !(s.license_type == schedule.license_type
                && s.effective_date == schedule.effective_date)
        });
        schedules.push(schedule);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<FeeSchedule>> {
        self.ensure_available("list fee schedules")?;
        Ok(self.tables.schedules.read().await.clone())
    }
}

#[async_trait]
impl FeeHistoryLog for InMemoryStore {
    async fn append(&self, record: FeeChangeRecord) -> Result<()> {
        self.ensure_available("append fee history")?;
        self.tables.history.write().await.push(record);
        Ok(())
    }

    async fn entries(&self, license_type: Option<LicenseType>) -> Result<Vec<FeeChangeRecord>> {
        self.ensure_available("read fee history")?;
        let history = self.tables.history.read().await;
        Ok(history
            .iter()
            .filter(|r| license_type.map(|t| r.license_type() == t).unwrap_or(true))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GpsCoordinates;

    fn new_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            email: "info@example.co.zw".to_string(),
            contact_person: "Tendai Moyo".to_string(),
            address: "12 Samora Machel Ave".to_string(),
            gps_coordinates: GpsCoordinates {
                lat: -17.8252,
                lng: 31.0335,
            },
        }
    }

    fn schedule(license_type: LicenseType, app: f64, date: (i32, u32, u32)) -> FeeSchedule {
        FeeSchedule {
            license_type,
            application_fee: app,
            license_fee: app * 1000.0,
            effective_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = InMemoryStore::new();
        let a = CompanyRepository::create(&store, new_company("Alpha Telecom")).await.unwrap();
        let b = CompanyRepository::create(&store, new_company("Beta Radio")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("cmp-"));
    }

    #[tokio::test]
    async fn test_seeded_ids_are_not_reused() {
        let seeded = CompanyRecord::from_new("cmp-000001".to_string(), new_company("Seeded"));
        let store = InMemoryStore::from_snapshot(Snapshot {
            companies: vec![seeded],
            ..Snapshot::default()
        });
        let created = CompanyRepository::create(&store, new_company("Fresh")).await.unwrap();
        assert_eq!(created.id, "cmp-000002");
    }

    #[tokio::test]
    async fn test_name_filter_is_case_insensitive() {
        let store = InMemoryStore::new();
        CompanyRepository::create(&store, new_company("Radio Wave Broadcasting")).await.unwrap();
        CompanyRepository::create(&store, new_company("TeleCom Solutions Ltd")).await.unwrap();
        let hits = CompanyRepository::list(&store, Some("RADIO")).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_active_schedule_by_date() {
        let store = InMemoryStore::new();
        store.activate(schedule(LicenseType::Ctl, 750.0, (2022, 1, 1))).await.unwrap();
        store.activate(schedule(LicenseType::Ctl, 800.0, (2023, 1, 1))).await.unwrap();
        store.activate(schedule(LicenseType::Prsl, 300.0, (2022, 1, 1))).await.unwrap();

        let mid_2022 = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let active = store.active(LicenseType::Ctl, mid_2022).await.unwrap().unwrap();
        assert_eq!(active.application_fee, 750.0);

        let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let active = store.active(LicenseType::Ctl, later).await.unwrap().unwrap();
        assert_eq!(active.application_fee, 800.0);

        let early = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        assert!(store.active(LicenseType::Ctl, early).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activate_replaces_same_effective_date() {
        let store = InMemoryStore::new();
        store.activate(schedule(LicenseType::Ctl, 750.0, (2023, 1, 1))).await.unwrap();
        store.activate(schedule(LicenseType::Ctl, 800.0, (2023, 1, 1))).await.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_reports_upstream() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let err = LicenseRepository::list(&store, &LicenseFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Upstream { .. }));
    }

    #[test]
    fn test_snapshot_reflects_writes() {
        let store = InMemoryStore::new();
        let snapshot = tokio_test::block_on(async {
            CompanyRepository::create(&store, new_company("Mobile Connect"))
                .await
                .unwrap();
            store
                .activate(schedule(LicenseType::Prsl, 300.0, (2023, 1, 1)))
                .await
                .unwrap();
            store.snapshot().await
        });
        assert_eq!(snapshot.companies.len(), 1);
        assert_eq!(snapshot.fee_schedules.len(), 1);
        assert!(snapshot.licenses.is_empty());
    }

    #[test]
    fn test_snapshot_parses_partial_json() {
        let json = br#"{"companies": []}"#;
        let snapshot = Snapshot::from_json_slice(json).unwrap();
        assert!(snapshot.licenses.is_empty());
        assert!(snapshot.fee_history.is_empty());
    }
}

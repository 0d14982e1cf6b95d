use crate::domain::model::{
    CompanyRecord, FeeChangeRecord, FeeSchedule, LicenseFilter, LicenseRecord, LicenseType,
    NewCompany, NewLicense,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Company persistence collaborator. Implementations report their own
/// failures as `LedgerError::Upstream`.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// `name` is a case-insensitive substring filter.
    async fn list(&self, name: Option<&str>) -> Result<Vec<CompanyRecord>>;
    async fn get(&self, id: &str) -> Result<Option<CompanyRecord>>;
    async fn exists_by_name(&self, name: &str) -> Result<bool>;
    /// Assigns the id.
    async fn create(&self, company: NewCompany) -> Result<CompanyRecord>;
    async fn update(&self, id: &str, company: NewCompany) -> Result<Option<CompanyRecord>>;
    /// Returns `false` when no record had that id.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait LicenseRepository: Send + Sync {
    async fn list(&self, filter: &LicenseFilter) -> Result<Vec<LicenseRecord>>;
    async fn get(&self, id: &str) -> Result<Option<LicenseRecord>>;
    async fn create(&self, license: NewLicense) -> Result<LicenseRecord>;
    async fn update(&self, id: &str, license: NewLicense) -> Result<Option<LicenseRecord>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait FeeScheduleRepository: Send + Sync {
    /// The schedule with the latest effective date on or before `as_of`.
    async fn active(&self, license_type: LicenseType, as_of: NaiveDate)
        -> Result<Option<FeeSchedule>>;
    /// Stores `schedule`, replacing one of the same type and effective date.
    async fn activate(&self, schedule: FeeSchedule) -> Result<()>;
    async fn all(&self) -> Result<Vec<FeeSchedule>>;
}

/// Append-only log; entries are never updated or removed.
#[async_trait]
pub trait FeeHistoryLog: Send + Sync {
    async fn append(&self, record: FeeChangeRecord) -> Result<()>;
    /// Entries in insertion order, optionally restricted to one license type.
    async fn entries(&self, license_type: Option<LicenseType>) -> Result<Vec<FeeChangeRecord>>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of "now" for every time-derived field.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

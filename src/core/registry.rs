use crate::core::dashboard::DashboardSummary;
use crate::core::search::retain_matching;
use crate::core::validator::{validate_company, validate_license};
use crate::core::view::{derive_all, LicenseView, DEFAULT_CURRENCY_SYMBOL};
use crate::domain::model::{
    CompanyDraft, CompanyRecord, LicenseDraft, LicenseFilter, LicenseRecord,
};
use crate::domain::ports::{Clock, CompanyRepository, LicenseRepository};
use crate::utils::error::{LedgerError, Result};

const COMPANY: &str = "Company";
const LICENSE: &str = "License";

/// Front door for company and license operations: validates intake, delegates
/// storage to the repositories and derives views against the clock.
pub struct LicenseRegistry<CR, LR, C> {
    companies: CR,
    licenses: LR,
    clock: C,
    currency_symbol: String,
}

impl<CR, LR, C> LicenseRegistry<CR, LR, C>
where
    CR: CompanyRepository,
    LR: LicenseRepository,
    C: Clock,
{
    pub fn new(companies: CR, licenses: LR, clock: C) -> Self {
        Self {
            companies,
            licenses,
            clock,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    // companies

    pub async fn register_company(&self, draft: &CompanyDraft) -> Result<CompanyRecord> {
        let company = validate_company(draft)?;
        if self.companies.exists_by_name(&company.name).await? {
            return Err(LedgerError::Conflict {
                entity: COMPANY,
                message: format!("Company with name already exists: {}", company.name),
            });
        }

        let created = self.companies.create(company).await?;
        tracing::info!("Registered company {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update_company(&self, id: &str, draft: &CompanyDraft) -> Result<CompanyRecord> {
        let company = validate_company(draft)?;
        let existing = self.company(id).await?;

        if existing.name != company.name && self.companies.exists_by_name(&company.name).await? {
            return Err(LedgerError::Conflict {
                entity: COMPANY,
                message: format!("Company with name already exists: {}", company.name),
            });
        }

        self.companies
            .update(id, company)
            .await?
            .ok_or_else(|| LedgerError::not_found(COMPANY, id))
    }

    pub async fn delete_company(&self, id: &str) -> Result<()> {
        if !self.companies.delete(id).await? {
            return Err(LedgerError::not_found(COMPANY, id));
        }
        tracing::info!("Deleted company {}", id);
        Ok(())
    }

    pub async fn company(&self, id: &str) -> Result<CompanyRecord> {
        self.companies
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(COMPANY, id))
    }

    /// `name` goes to the repository; `query` is the free-text search over
    /// name, contact person and email.
    pub async fn companies(&self, name: Option<&str>, query: &str) -> Result<Vec<CompanyRecord>> {
        let records = self.companies.list(name).await?;
        Ok(retain_matching(records, query))
    }

    // licenses

    pub async fn issue_license(&self, draft: &LicenseDraft) -> Result<LicenseView> {
        let license = validate_license(draft)?;
        let created = self.licenses.create(license).await?;
        tracing::info!(
            "Issued {} license {} to {}",
            created.license_type,
            created.id,
            created.company_name
        );
        Ok(self.view(created))
    }

    pub async fn update_license(&self, id: &str, draft: &LicenseDraft) -> Result<LicenseView> {
        let license = validate_license(draft)?;
        let updated = self
            .licenses
            .update(id, license)
            .await?
            .ok_or_else(|| LedgerError::not_found(LICENSE, id))?;
        Ok(self.view(updated))
    }

    pub async fn delete_license(&self, id: &str) -> Result<()> {
        if !self.licenses.delete(id).await? {
            return Err(LedgerError::not_found(LICENSE, id));
        }
        tracing::info!("Deleted license {}", id);
        Ok(())
    }

    pub async fn license(&self, id: &str) -> Result<LicenseView> {
        let record = self
            .licenses
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(LICENSE, id))?;
        Ok(self.view(record))
    }

    /// Derived views for every license passing `filter` whose company name,
    /// type or status matches `query`. Upstream failures are returned as-is.
    pub async fn licenses(&self, filter: &LicenseFilter, query: &str) -> Result<Vec<LicenseView>> {
        let records = self.licenses.list(filter).await.inspect_err(|e| {
            tracing::warn!("License listing failed: {}", e);
        })?;
        let views = derive_all(records, self.clock.now(), &self.currency_symbol);
        Ok(retain_matching(views, query))
    }

    pub async fn dashboard(&self, expiry_window_days: i64) -> Result<DashboardSummary> {
        let companies = self.companies.list(None).await?;
        let views = self.licenses(&LicenseFilter::default(), "").await?;
        Ok(DashboardSummary::build(
            companies.len(),
            &views,
            expiry_window_days,
            &self.currency_symbol,
        ))
    }

    fn view(&self, record: LicenseRecord) -> LicenseView {
        LicenseView::derive(record, self.clock.now(), &self.currency_symbol)
    }
}

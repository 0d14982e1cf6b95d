pub mod dashboard;
pub mod expiry;
pub mod fees;
pub mod registry;
pub mod search;
pub mod status;
pub mod validator;
pub mod view;

pub use crate::domain::model::{
    CompanyDraft, CompanyRecord, FeeChangeRecord, FeeSchedule, FeeUpdateRequest, LicenseDraft,
    LicenseFilter, LicenseRecord, LicenseStatus, LicenseType,
};
pub use crate::domain::ports::{
    Clock, CompanyRepository, FeeHistoryLog, FeeScheduleRepository, FixedClock,
    LicenseRepository, Storage, SystemClock,
};
pub use crate::utils::error::Result;

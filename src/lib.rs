pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{memory::InMemoryStore, storage::LocalStorage};
pub use core::{fees::FeeChangeRecorder, registry::LicenseRegistry, view::LicenseView};
pub use utils::error::{LedgerError, Result};

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SiteConfig;

pub use app::{Collaborators, DesignSettings};
pub use domain::model::{ItemId, NavigationItem, ThemeIssue, ThemeRecord};
pub use utils::error::{DesignError, Result};

pub mod download;
pub mod job;
pub mod navigation;
pub mod save;
pub mod theme_activation;
pub mod theme_deletion;
pub mod validation;

pub use crate::domain::model::{ItemId, NavigationItem, ThemeIssue, ThemeRecord};
pub use crate::domain::ports::{
    ConfigProvider, DeliveryChannel, DownloadHost, ItemValidator, NavigationStore, Notifier,
    SessionProvider, ThemeCache, ThemeStore,
};
pub use crate::utils::error::Result;

use crate::domain::model::{NavigationItem, ThemeRecord};
use crate::utils::error::{DesignError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub trait ConfigProvider: Send + Sync {
    fn blog_url(&self) -> &str;
    fn api_root(&self) -> &str;
}

pub trait SessionProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Best-effort surfacing of an error to the user.
pub trait Notifier: Send + Sync {
    fn show_api_error(&self, error: &DesignError);
}

#[async_trait]
pub trait ItemValidator: Send + Sync {
    async fn validate(&self, item: &NavigationItem) -> Result<()>;
}

#[async_trait]
pub trait NavigationStore: Send + Sync {
    async fn save(&self, items: &[NavigationItem]) -> Result<Vec<NavigationItem>>;
}

#[async_trait]
pub trait ThemeStore: Send + Sync {
    /// Returns the activated record with the warnings and errors the server attached.
    async fn activate(&self, theme: &ThemeRecord) -> Result<ThemeRecord>;
    async fn destroy(&self, theme: &ThemeRecord) -> Result<()>;
}

pub trait ThemeCache: Send + Sync {
    fn insert(&self, theme: ThemeRecord);
    fn peek(&self, name: &str) -> Option<ThemeRecord>;
    fn evict(&self, name: &str);
}

/// Out-of-band download sink. Fire-and-forget.
pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, url: &str);
}

/// Owner of delivery channels, asked for one only when none exists yet.
pub trait DownloadHost: Send + Sync {
    fn attach_channel(&self) -> Arc<dyn DeliveryChannel>;
}

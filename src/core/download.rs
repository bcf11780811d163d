use crate::domain::ports::{ConfigProvider, DeliveryChannel, DownloadHost, SessionProvider};
use crate::utils::error::{DesignError, Result};
use std::sync::{Arc, OnceLock};

/// `url` with exactly one trailing slash appended when it has none.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

pub fn theme_download_url(api_root: &str, theme_name: &str, access_token: &str) -> String {
    format!(
        "{}/themes/{}/download/?access_token={}",
        api_root, theme_name, access_token
    )
}

/// Hands signed theme download URLs to one lazily attached delivery channel.
pub struct DownloadDispatcher {
    config: Arc<dyn ConfigProvider>,
    session: Arc<dyn SessionProvider>,
    host: Arc<dyn DownloadHost>,
    channel: OnceLock<Arc<dyn DeliveryChannel>>,
}

impl DownloadDispatcher {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        session: Arc<dyn SessionProvider>,
        host: Arc<dyn DownloadHost>,
    ) -> Self {
        Self {
            config,
            session,
            host,
            channel: OnceLock::new(),
        }
    }

    /// Returns the URL handed to the channel. Delivery itself is not observed.
    pub fn download_theme(&self, theme_name: &str) -> Result<String> {
        let token = self.session.access_token().ok_or(DesignError::NotAuthenticated)?;
        let url = theme_download_url(self.config.api_root(), theme_name, &token);

        let channel = self.channel.get_or_init(|| {
            tracing::debug!("Attaching download channel");
            self.host.attach_channel()
        });
        tracing::info!("Downloading theme '{}'", theme_name);
        channel.deliver(&url);
        Ok(url)
    }
}
